//! SELECT statement composers.

use tracing::trace;

use crate::frag::Frag;
use crate::query::{Query, Render};
use crate::stmt::push_clause;
use crate::value::Value;

/// SELECT composer where every clause is a [`Frag`].
///
/// This is the general form: fields, group-by and order-by can carry their
/// own placeholders (computed or aliased expressions). [`Select`] is the
/// literal-column front that lowers onto it.
#[derive(Debug, Clone)]
pub struct SelectExpr {
    distinct: bool,
    fields: Frag,
    table: Frag,
    filter: Option<Frag>,
    group_by: Option<Frag>,
    having: Option<Frag>,
    order_by: Option<Frag>,
    limit: Option<Frag>,
}

impl SelectExpr {
    /// Create a composer with the two required clauses.
    pub fn new(fields: Frag, table: Frag) -> Self {
        Self {
            distinct: false,
            fields,
            table,
            filter: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        }
    }

    /// Render `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the WHERE clause.
    pub fn filter(mut self, cond: Frag) -> Self {
        self.filter = Some(cond);
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, group_by: Frag) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Set the HAVING clause.
    pub fn having(mut self, cond: Frag) -> Self {
        self.having = Some(cond);
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, order_by: Frag) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Set the LIMIT clause fragment.
    ///
    /// [`Select::limit`] and [`Select::limit_with_offset`] produce the
    /// placeholder forms; use this directly only for custom limit text.
    pub fn limit(mut self, limit: Frag) -> Self {
        self.limit = Some(limit);
        self
    }

    fn render_parts(&self) -> Query {
        let mut args = Vec::new();
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&self.fields.build_into(&mut args));
        sql.push_str(" FROM ");
        sql.push_str(&self.table.build_into(&mut args));
        push_clause(&mut sql, &mut args, " WHERE ", self.filter.as_ref());
        push_clause(&mut sql, &mut args, " GROUP BY ", self.group_by.as_ref());
        push_clause(&mut sql, &mut args, " HAVING ", self.having.as_ref());
        push_clause(&mut sql, &mut args, " ORDER BY ", self.order_by.as_ref());
        push_clause(&mut sql, &mut args, " LIMIT ", self.limit.as_ref());
        Query { sql, args }
    }
}

impl Render for SelectExpr {
    fn render(&self) -> Query {
        let query = self.render_parts();
        trace!(sql = %query.sql, args = query.args.len(), "rendered SELECT");
        query
    }
}

/// LIMIT forms, always rendered through placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limit {
    Count(i64),
    OffsetCount(i64, i64),
}

impl Limit {
    fn to_frag(self) -> Frag {
        match self {
            Limit::Count(n) => Frag::raw_with("?", [n]),
            Limit::OffsetCount(offset, n) => Frag::raw_with("?,?", [offset, n]),
        }
    }
}

/// SELECT composer over literal column-name lists.
///
/// Fields, group-by and order-by are plain comma-joined column strings with
/// no placeholders of their own; table, WHERE and HAVING are fragments. An
/// empty field list renders `*`.
///
/// ```
/// use sqlfrag::{Frag, Render, Select};
///
/// let q = Select::new(Frag::raw("tb"))
///     .fields(["name", "age"])
///     .filter(Frag::in_list("age", [1, 2, 3])?)
///     .render();
/// assert_eq!(q.sql, "SELECT name,age FROM tb WHERE age IN (?,?,?)");
/// assert_eq!(q.args.len(), 3);
/// # Ok::<(), sqlfrag::BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    distinct: bool,
    fields: Vec<String>,
    table: Frag,
    filter: Option<Frag>,
    group_by: Option<String>,
    having: Option<Frag>,
    order_by: Vec<String>,
    limit: Option<Limit>,
}

impl Select {
    /// Create a `SELECT * FROM table` composer.
    pub fn new(table: Frag) -> Self {
        Self {
            distinct: false,
            fields: Vec::new(),
            table,
            filter: None,
            group_by: None,
            having: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Set the selected columns.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Render `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the WHERE clause.
    ///
    /// An empty AND/OR group omits the clause entirely.
    pub fn filter(mut self, cond: Frag) -> Self {
        self.filter = Some(cond);
        self
    }

    /// Set the GROUP BY column list.
    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    /// Set the HAVING clause.
    pub fn having(mut self, cond: Frag) -> Self {
        self.having = Some(cond);
        self
    }

    /// Set the ORDER BY column list.
    pub fn order_by<I, S>(mut self, order_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = order_by.into_iter().map(Into::into).collect();
        self
    }

    /// Limit to `n` rows: renders `LIMIT ?` with `n` bound.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(Limit::Count(n));
        self
    }

    /// Skip `offset` rows then take `n`: renders `LIMIT ?,?` with both bound.
    pub fn limit_with_offset(mut self, offset: i64, n: i64) -> Self {
        self.limit = Some(Limit::OffsetCount(offset, n));
        self
    }

    fn lower(&self) -> SelectExpr {
        let fields = if self.fields.is_empty() {
            Frag::raw("*")
        } else {
            Frag::raw(self.fields.join(","))
        };
        SelectExpr {
            distinct: self.distinct,
            fields,
            table: self.table.clone(),
            filter: self.filter.clone(),
            group_by: self.group_by.clone().map(Frag::raw),
            having: self.having.clone(),
            order_by: if self.order_by.is_empty() {
                None
            } else {
                Some(Frag::raw(self.order_by.join(",")))
            },
            limit: self.limit.map(Limit::to_frag),
        }
    }
}

impl Render for Select {
    fn render(&self) -> Query {
        let query = self.lower().render_parts();
        trace!(sql = %query.sql, args = query.args.len(), "rendered SELECT");
        query
    }
}

/// Joins member selects with ` UNION ALL `, concatenating their argument
/// sequences in listed order.
#[derive(Debug, Clone)]
pub struct UnionAll {
    selects: Vec<Select>,
}

impl UnionAll {
    /// Create a union over the given members.
    pub fn new(selects: Vec<Select>) -> Self {
        Self { selects }
    }

    /// Append a member select.
    pub fn push(mut self, select: Select) -> Self {
        self.selects.push(select);
        self
    }
}

impl Render for UnionAll {
    fn render(&self) -> Query {
        let mut sql = String::new();
        let mut args: Vec<Value> = Vec::new();
        for (i, select) in self.selects.iter().enumerate() {
            if i > 0 {
                sql.push_str(" UNION ALL ");
            }
            let member = select.lower().render_parts();
            sql.push_str(&member.sql);
            args.extend(member.args);
        }
        let query = Query { sql, args };
        trace!(sql = %query.sql, args = query.args.len(), "rendered UNION ALL");
        query
    }
}
