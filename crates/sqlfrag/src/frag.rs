//! The fragment tree: every composable piece of parameterized SQL.
//!
//! A [`Frag`] is an immutable node that renders to SQL text plus the
//! arguments its `?` markers bind, in left-to-right marker order. Parents own
//! their children by value, so a tree renders the same way every time.
//!
//! Emptiness is structural: an AND/OR group with no (or only empty) children
//! reports [`Frag::is_empty`], and group rendering skips empty children
//! without emitting a dangling operator. Statement composers use the same
//! probe to omit an entire clause instead of rendering `WHERE ()`.

use std::collections::HashMap;

use crate::error::{BuildError, BuildResult};
use crate::query::{Query, Render};
use crate::value::Value;

/// Marker character consumed by [`Frag::embed`] templates.
const EMBED_MARKER: char = '$';

/// SQL join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinKind {
    /// `JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `CROSS JOIN`
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// Internal representation of a [`Frag`].
///
/// Kept private so every fragment goes through a validating constructor;
/// an `In` or `Values` node that exists is already well-formed.
#[derive(Debug, Clone)]
enum FragInner {
    Raw {
        sql: String,
        args: Vec<Value>,
    },
    And(Vec<Frag>),
    Or(Vec<Frag>),
    Alias {
        inner: Box<Frag>,
        alias: String,
    },
    Bracket(Box<Frag>),
    In {
        column: String,
        values: Vec<Value>,
    },
    Join {
        kind: JoinKind,
        left: Box<Frag>,
        right: Box<Frag>,
        on: Option<Box<Frag>>,
    },
    Case {
        subject: Option<Box<Frag>>,
        arms: Vec<(Frag, Frag)>,
        otherwise: Option<Box<Frag>>,
    },
    Func {
        name: String,
        args: Vec<Frag>,
    },
    Comma(Vec<Frag>),
    Embed {
        template: String,
        parts: Vec<Frag>,
    },
    Values {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Assign {
        pairs: Vec<(String, Value)>,
    },
}

/// One node of a composable SQL fragment tree.
///
/// ```
/// use sqlfrag::{Frag, Render};
///
/// let cond = Frag::or(vec![
///     Frag::raw("c1=1"),
///     Frag::eq("c2", 2),
///     Frag::and(vec![Frag::gt("c3", 3), Frag::in_list("c5", [5, 6])?]),
/// ]);
/// let q = cond.render();
/// assert_eq!(q.sql, "(c1=1 OR c2 = ? OR (c3 > ? AND c5 IN (?,?)))");
/// assert_eq!(q.args.len(), 4);
/// # Ok::<(), sqlfrag::BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Frag(FragInner);

impl Frag {
    /// Create a raw SQL fragment without arguments.
    ///
    /// Raw text is the leaf and escape hatch of the tree; nothing is escaped
    /// or validated at this level.
    pub fn raw(sql: impl Into<String>) -> Self {
        Frag(FragInner::Raw {
            sql: sql.into(),
            args: Vec::new(),
        })
    }

    /// Create a raw SQL fragment with `?` markers and their arguments.
    ///
    /// The marker/argument pairing is the caller's responsibility here;
    /// statement-level helpers validate theirs.
    pub fn raw_with<I, V>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Frag(FragInner::Raw {
            sql: sql.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// Join child fragments with ` AND `, wrapped in parentheses.
    ///
    /// Empty children (see [`Frag::is_empty`]) are skipped without leaving a
    /// dangling operator. A group whose children are all empty is itself
    /// empty; it still renders as `()` if rendered directly, so composers
    /// must probe emptiness and omit the owning clause.
    pub fn and<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Frag>,
    {
        Frag(FragInner::And(children.into_iter().collect()))
    }

    /// Join child fragments with ` OR `, wrapped in parentheses.
    ///
    /// Same elision rules as [`Frag::and`].
    pub fn or<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Frag>,
    {
        Frag(FragInner::Or(children.into_iter().collect()))
    }

    /// Alias a fragment: `inner AS alias`.
    ///
    /// If the rendered inner text contains any whitespace it is wrapped in
    /// parentheses first. This distinguishes a bare identifier from a
    /// computed expression or subquery.
    pub fn alias(inner: Frag, alias: impl Into<String>) -> Self {
        Frag(FragInner::Alias {
            inner: Box::new(inner),
            alias: alias.into(),
        })
    }

    /// Wrap a fragment in parentheses unconditionally.
    pub fn bracket(inner: Frag) -> Self {
        Frag(FragInner::Bracket(Box::new(inner)))
    }

    /// Create `column IN (?,?,…)` with one marker per value.
    ///
    /// An empty value list is rejected with [`BuildError::EmptyInList`]
    /// rather than rendering malformed SQL.
    pub fn in_list<I, V>(column: impl Into<String>, values: I) -> BuildResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let column = column.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(BuildError::EmptyInList(column));
        }
        Ok(Frag(FragInner::In { column, values }))
    }

    /// Join two fragments: `left KEYWORD right [ON on]`.
    ///
    /// Arguments are concatenated left, right, then on. [`JoinKind::Inner`]
    /// renders the bare `JOIN` keyword.
    pub fn join(kind: JoinKind, left: Frag, right: Frag, on: Option<Frag>) -> Self {
        Frag(FragInner::Join {
            kind,
            left: Box::new(left),
            right: Box::new(right),
            on: on.map(Box::new),
        })
    }

    /// Start a `CASE … WHEN … THEN … END` expression.
    ///
    /// ```
    /// use sqlfrag::{Frag, Render};
    ///
    /// let q = Frag::case()
    ///     .subject(Frag::raw("grade"))
    ///     .when(Frag::raw_with("?", [60]), Frag::raw("'low'"))
    ///     .otherwise(Frag::raw("'high'"))
    ///     .end()
    ///     .render();
    /// assert_eq!(q.sql, "CASE grade WHEN ? THEN 'low' ELSE 'high' END");
    /// assert_eq!(q.args.len(), 1);
    /// ```
    pub fn case() -> CaseWhen {
        CaseWhen::default()
    }

    /// Create a function call: `name(a,b,…)`.
    pub fn func<I>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = Frag>,
    {
        Frag(FragInner::Func {
            name: name.into(),
            args: args.into_iter().collect(),
        })
    }

    /// Join fragments with `,` and no wrapping parentheses.
    ///
    /// Used for expression lists built from sub-fragments rather than
    /// literal column-name strings.
    pub fn comma<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Frag>,
    {
        Frag(FragInner::Comma(parts.into_iter().collect()))
    }

    /// Substitute fragments into a template at `$` markers, left to right.
    ///
    /// Each `$` occurrence is replaced by the next fragment's rendered text
    /// and all fragments' arguments are concatenated in substitution order.
    /// This lets a literal SQL template absorb pre-built subexpressions
    /// without re-deriving placeholder bookkeeping:
    ///
    /// ```
    /// use sqlfrag::{Frag, Render};
    ///
    /// let q = Frag::embed(
    ///     "max($,$)",
    ///     vec![Frag::raw_with("?", [1]), Frag::raw_with("?", [2])],
    /// )
    /// .render();
    /// assert_eq!(q.sql, "max(?,?)");
    /// assert_eq!(q.args.len(), 2);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics when the marker count differs from the fragment count. That
    /// mismatch is a caller bug, not bad runtime data, so it is unrecoverable
    /// by design.
    pub fn embed<I>(template: impl Into<String>, parts: I) -> Self
    where
        I: IntoIterator<Item = Frag>,
    {
        let template = template.into();
        let parts: Vec<Frag> = parts.into_iter().collect();
        let markers = template.matches(EMBED_MARKER).count();
        if markers != parts.len() {
            panic!(
                "embed template `{template}` has {markers} `$` markers but {} fragments were supplied",
                parts.len()
            );
        }
        Frag(FragInner::Embed { template, parts })
    }

    /// Create a `[(col,…) ]VALUES (?,…)[,(?,…)]…` clause from rectangular rows.
    ///
    /// Pass an empty `columns` iterator to omit the column list. Rows are
    /// validated up front: at least one row, no empty rows, all rows the same
    /// length, and the column count (when given) matching that length.
    /// Arguments are flattened row-major.
    pub fn values<C, S>(columns: C, rows: Vec<Vec<Value>>) -> BuildResult<Self>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let Some(first) = rows.first() else {
            return Err(BuildError::EmptyRows);
        };
        let width = first.len();
        if width == 0 {
            return Err(BuildError::EmptyRow { row: 0 });
        }
        if !columns.is_empty() && columns.len() != width {
            return Err(BuildError::ColumnCountMismatch {
                columns: columns.len(),
                row_len: width,
            });
        }
        for (row, values) in rows.iter().enumerate().skip(1) {
            if values.len() != width {
                return Err(BuildError::RowLengthMismatch {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
        }
        Ok(Frag(FragInner::Values { columns, rows }))
    }

    /// Create a `col1=?,col2=?,…` assignment list in map iteration order.
    ///
    /// The rendered column order (and the matching argument order) depends on
    /// the map's internal iteration order and may differ across calls with
    /// the same logical input. Acceptable for one-shot execution; use
    /// [`Frag::assign_sorted`] wherever the rendered text must be
    /// reproducible.
    pub fn assign(columns: HashMap<String, Value>) -> Self {
        let pairs: Vec<(String, Value)> = columns.into_iter().collect();
        Frag(FragInner::Assign { pairs })
    }

    /// Create a `col1=?,col2=?,…` assignment list sorted by column name.
    ///
    /// Output is byte-identical for any two maps holding the same key-value
    /// pairs, regardless of construction order. Prefer this variant whenever
    /// determinism matters.
    pub fn assign_sorted(columns: HashMap<String, Value>) -> Self {
        let mut pairs: Vec<(String, Value)> = columns.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Frag(FragInner::Assign { pairs })
    }

    /// Capture any renderable as a raw fragment.
    ///
    /// This is how a built statement nests inside a larger tree, e.g. an
    /// aliased subquery in a FROM clause. Marker/argument order is preserved
    /// across the boundary.
    pub fn from_render(renderable: &impl Render) -> Self {
        let query = renderable.render();
        Frag(FragInner::Raw {
            sql: query.sql,
            args: query.args,
        })
    }

    /// Create `column = ?` with one argument.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "=", value)
    }

    /// Create `column != ?` with one argument.
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "!=", value)
    }

    /// Create `column > ?` with one argument.
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, ">", value)
    }

    /// Create `column >= ?` with one argument.
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, ">=", value)
    }

    /// Create `column < ?` with one argument.
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "<", value)
    }

    /// Create `column <= ?` with one argument.
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "<=", value)
    }

    fn cmp(column: impl Into<String>, op: &str, value: impl Into<Value>) -> Self {
        Frag(FragInner::Raw {
            sql: format!("{} {op} ?", column.into()),
            args: vec![value.into()],
        })
    }

    /// Check whether this fragment is semantically absent.
    ///
    /// Only AND/OR groups can be empty: a group with zero children, or whose
    /// children are all empty, counts. Statement composers omit the owning
    /// clause for empty fragments instead of rendering `WHERE ()`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            FragInner::And(children) | FragInner::Or(children) => {
                children.iter().all(Frag::is_empty)
            }
            _ => false,
        }
    }

    /// Render this fragment, appending its arguments to `args`.
    pub(crate) fn build_into(&self, args: &mut Vec<Value>) -> String {
        match &self.0 {
            FragInner::Raw { sql, args: a } => {
                args.extend(a.iter().cloned());
                sql.clone()
            }
            FragInner::And(children) => group(children, " AND ", args),
            FragInner::Or(children) => group(children, " OR ", args),
            FragInner::Alias { inner, alias } => {
                let mut sql = inner.build_into(args);
                if sql.chars().any(char::is_whitespace) {
                    sql = format!("({sql})");
                }
                sql.push_str(" AS ");
                sql.push_str(alias);
                sql
            }
            FragInner::Bracket(inner) => format!("({})", inner.build_into(args)),
            FragInner::In { column, values } => {
                args.extend(values.iter().cloned());
                let mut sql = String::with_capacity(column.len() + 6 + values.len() * 2);
                sql.push_str(column);
                sql.push_str(" IN ");
                push_marker_group(&mut sql, values.len());
                sql
            }
            FragInner::Join {
                kind,
                left,
                right,
                on,
            } => {
                let mut sql = left.build_into(args);
                sql.push(' ');
                sql.push_str(kind.keyword());
                sql.push(' ');
                sql.push_str(&right.build_into(args));
                if let Some(on) = on {
                    sql.push_str(" ON ");
                    sql.push_str(&on.build_into(args));
                }
                sql
            }
            FragInner::Case {
                subject,
                arms,
                otherwise,
            } => {
                let mut sql = String::from("CASE");
                if let Some(subject) = subject {
                    sql.push(' ');
                    sql.push_str(&subject.build_into(args));
                }
                for (cond, result) in arms {
                    sql.push_str(" WHEN ");
                    sql.push_str(&cond.build_into(args));
                    sql.push_str(" THEN ");
                    sql.push_str(&result.build_into(args));
                }
                if let Some(otherwise) = otherwise {
                    sql.push_str(" ELSE ");
                    sql.push_str(&otherwise.build_into(args));
                }
                sql.push_str(" END");
                sql
            }
            FragInner::Func { name, args: fargs } => {
                let mut sql = name.clone();
                sql.push('(');
                for (i, arg) in fargs.iter().enumerate() {
                    if i > 0 {
                        sql.push(',');
                    }
                    sql.push_str(&arg.build_into(args));
                }
                sql.push(')');
                sql
            }
            FragInner::Comma(parts) => {
                let mut sql = String::new();
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        sql.push(',');
                    }
                    sql.push_str(&part.build_into(args));
                }
                sql
            }
            FragInner::Embed { template, parts } => {
                let mut sql = String::with_capacity(template.len());
                let mut parts = parts.iter();
                for ch in template.chars() {
                    if ch == EMBED_MARKER {
                        // Arity was checked at construction.
                        let part = parts.next().expect("embed marker without fragment");
                        sql.push_str(&part.build_into(args));
                    } else {
                        sql.push(ch);
                    }
                }
                sql
            }
            FragInner::Values { columns, rows } => {
                let width = rows[0].len();
                let mut marker_group = String::with_capacity(width * 2 + 1);
                push_marker_group(&mut marker_group, width);

                let mut sql = String::new();
                if !columns.is_empty() {
                    sql.push('(');
                    sql.push_str(&columns.join(","));
                    sql.push_str(") ");
                }
                sql.push_str("VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        sql.push(',');
                    }
                    sql.push_str(&marker_group);
                    args.extend(row.iter().cloned());
                }
                sql
            }
            FragInner::Assign { pairs } => {
                let mut sql = String::new();
                for (i, (column, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        sql.push(',');
                    }
                    sql.push_str(column);
                    sql.push_str("=?");
                    args.push(value.clone());
                }
                sql
            }
        }
    }
}

impl Render for Frag {
    fn render(&self) -> Query {
        let mut args = Vec::new();
        let sql = self.build_into(&mut args);
        Query { sql, args }
    }
}

/// Render an AND/OR group, skipping empty children.
fn group(children: &[Frag], separator: &str, args: &mut Vec<Value>) -> String {
    let mut sql = String::from("(");
    let mut first = true;
    for child in children {
        if child.is_empty() {
            continue;
        }
        if !first {
            sql.push_str(separator);
        }
        sql.push_str(&child.build_into(args));
        first = false;
    }
    sql.push(')');
    sql
}

/// Append `(?,?,…)` with `count` markers.
fn push_marker_group(sql: &mut String, count: usize) {
    sql.push('(');
    for i in 0..count {
        if i > 0 {
            sql.push(',');
        }
        sql.push('?');
    }
    sql.push(')');
}

/// Builder for [`Frag::case`] expressions.
#[derive(Debug, Clone, Default)]
pub struct CaseWhen {
    subject: Option<Frag>,
    arms: Vec<(Frag, Frag)>,
    otherwise: Option<Frag>,
}

impl CaseWhen {
    /// Set the subject compared by each WHEN arm.
    pub fn subject(mut self, subject: Frag) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Append a `WHEN cond THEN result` arm.
    ///
    /// Arguments render in listed arm order, condition before result.
    pub fn when(mut self, cond: Frag, result: Frag) -> Self {
        self.arms.push((cond, result));
        self
    }

    /// Set the `ELSE` fallback.
    pub fn otherwise(mut self, otherwise: Frag) -> Self {
        self.otherwise = Some(otherwise);
        self
    }

    /// Finish the expression.
    pub fn end(self) -> Frag {
        Frag(FragInner::Case {
            subject: self.subject.map(Box::new),
            arms: self.arms,
            otherwise: self.otherwise.map(Box::new),
        })
    }
}

impl From<CaseWhen> for Frag {
    fn from(case: CaseWhen) -> Self {
        case.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(frag: &Frag, sql: &str, args: &[Value]) {
        let q = frag.render();
        assert_eq!(q.sql, sql);
        assert_eq!(q.args, args);
    }

    #[test]
    fn raw_passes_text_and_args_through() {
        check(&Frag::raw("age > 23"), "age > 23", &[]);
        check(
            &Frag::raw_with("age > ?", [23]),
            "age > ?",
            &[Value::Int(23)],
        );
    }

    #[test]
    fn renders_repeatedly_with_identical_results() {
        let frag = Frag::and(vec![Frag::eq("a", 1), Frag::in_list("b", [2, 3]).unwrap()]);
        let first = frag.render();
        let second = frag.render();
        assert_eq!(first, second);
        assert_eq!(first.placeholders(), first.args.len());
    }

    #[test]
    fn and_joins_children_in_parens() {
        let frag = Frag::and(vec![
            Frag::raw_with("total >= ?", [1000]),
            Frag::raw_with("total < ?", [50000]),
        ]);
        check(
            &frag,
            "(total >= ? AND total < ?)",
            &[Value::Int(1000), Value::Int(50000)],
        );
    }

    #[test]
    fn or_nests_inside_and() {
        let frag = Frag::or(vec![
            Frag::raw("c1=1"),
            Frag::raw_with("c2=?", [2]),
            Frag::and(vec![
                Frag::raw_with("c3=?", [3]),
                Frag::in_list("c5", [5, 6, 7]).unwrap(),
            ]),
        ]);
        check(
            &frag,
            "(c1=1 OR c2=? OR (c3=? AND c5 IN (?,?,?)))",
            &[
                Value::Int(2),
                Value::Int(3),
                Value::Int(5),
                Value::Int(6),
                Value::Int(7),
            ],
        );
    }

    #[test]
    fn empty_children_are_skipped_without_separators() {
        let frag = Frag::and(vec![
            Frag::or(vec![]),
            Frag::eq("a", 1),
            Frag::and(vec![Frag::or(vec![])]),
            Frag::eq("b", 2),
        ]);
        check(&frag, "(a = ? AND b = ?)", &[Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn all_empty_group_is_empty_and_renders_bare_parens() {
        let frag = Frag::and(vec![Frag::or(vec![]), Frag::and(vec![Frag::or(vec![])])]);
        assert!(frag.is_empty());
        check(&frag, "()", &[]);
    }

    #[test]
    fn non_group_fragments_are_never_empty() {
        assert!(!Frag::raw("").is_empty());
        assert!(!Frag::eq("a", 1).is_empty());
    }

    #[test]
    fn alias_wraps_expressions_but_not_identifiers() {
        check(&Frag::alias(Frag::raw("t1"), "a"), "t1 AS a", &[]);
        check(
            &Frag::alias(Frag::raw_with("count(*) filter (where x > ?)", [1]), "n"),
            "(count(*) filter (where x > ?)) AS n",
            &[Value::Int(1)],
        );
    }

    #[test]
    fn bracket_always_parenthesizes() {
        check(
            &Frag::bracket(Frag::raw_with("a=?", [1])),
            "(a=?)",
            &[Value::Int(1)],
        );
        check(&Frag::bracket(Frag::raw("t")), "(t)", &[]);
    }

    #[test]
    fn in_list_emits_one_marker_per_value() {
        let frag = Frag::in_list("age", [1, 2, 3]).unwrap();
        check(
            &frag,
            "age IN (?,?,?)",
            &[Value::Int(1), Value::Int(2), Value::Int(3)],
        );

        let single = Frag::in_list("age", [9]).unwrap();
        check(&single, "age IN (?)", &[Value::Int(9)]);
    }

    #[test]
    fn in_list_rejects_empty_values() {
        let err = Frag::in_list("age", Vec::<Value>::new()).unwrap_err();
        assert_eq!(err, BuildError::EmptyInList("age".to_string()));
    }

    #[test]
    fn join_renders_keyword_and_on_clause() {
        let frag = Frag::join(
            JoinKind::Inner,
            Frag::alias(Frag::raw("t1"), "t1"),
            Frag::alias(Frag::raw("t2"), "t2"),
            Some(Frag::raw("t1.id = t2.id")),
        );
        check(&frag, "t1 AS t1 JOIN t2 AS t2 ON t1.id = t2.id", &[]);
    }

    #[test]
    fn join_kinds_render_their_keywords() {
        for (kind, keyword) in [
            (JoinKind::Left, "LEFT JOIN"),
            (JoinKind::Right, "RIGHT JOIN"),
            (JoinKind::Cross, "CROSS JOIN"),
        ] {
            let frag = Frag::join(kind, Frag::raw("a"), Frag::raw("b"), None);
            check(&frag, &format!("a {keyword} b"), &[]);
        }
    }

    #[test]
    fn join_arguments_follow_left_right_on_order() {
        let frag = Frag::join(
            JoinKind::Left,
            Frag::raw_with("(SELECT id FROM a WHERE x=?)", [1]),
            Frag::raw_with("(SELECT id FROM b WHERE y=?)", [2]),
            Some(Frag::raw_with("a.id = b.id AND b.z=?", [3])),
        );
        let q = frag.render();
        assert_eq!(q.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(q.placeholders(), 3);
    }

    #[test]
    fn case_renders_subject_arms_and_else_in_order() {
        let frag = Frag::case()
            .subject(Frag::raw("score"))
            .when(Frag::raw_with("?", [1]), Frag::raw_with("?", [10]))
            .when(Frag::raw_with("?", [2]), Frag::raw_with("?", [20]))
            .otherwise(Frag::raw_with("?", [0]))
            .end();
        check(
            &frag,
            "CASE score WHEN ? THEN ? WHEN ? THEN ? ELSE ? END",
            &[
                Value::Int(1),
                Value::Int(10),
                Value::Int(2),
                Value::Int(20),
                Value::Int(0),
            ],
        );
    }

    #[test]
    fn case_without_subject_or_else() {
        let frag = Frag::case()
            .when(Frag::raw_with("a > ?", [5]), Frag::raw("'big'"))
            .end();
        check(
            &frag,
            "CASE WHEN a > ? THEN 'big' END",
            &[Value::Int(5)],
        );
    }

    #[test]
    fn func_joins_arguments_with_commas() {
        let frag = Frag::func(
            "coalesce",
            vec![Frag::raw("col"), Frag::raw_with("?", ["fallback"])],
        );
        check(
            &frag,
            "coalesce(col,?)",
            &[Value::Text("fallback".to_string())],
        );
    }

    #[test]
    fn comma_joins_without_parens() {
        let frag = Frag::comma(vec![
            Frag::raw("a"),
            Frag::alias(Frag::raw_with("sum(x) + ?", [1]), "total"),
        ]);
        check(&frag, "a,(sum(x) + ?) AS total", &[Value::Int(1)]);
    }

    #[test]
    fn embed_substitutes_markers_left_to_right() {
        let frag = Frag::embed(
            "max($,$)",
            vec![Frag::raw_with("?", [1]), Frag::raw_with("?", [2])],
        );
        check(&frag, "max(?,?)", &[Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn embed_does_not_rescan_substituted_text() {
        // A part rendering to text containing `$` must not consume a marker.
        let frag = Frag::embed("json_extract(doc, $)", vec![Frag::raw("'$.name'")]);
        check(&frag, "json_extract(doc, '$.name')", &[]);
    }

    #[test]
    #[should_panic(expected = "markers")]
    fn embed_panics_on_marker_mismatch() {
        let _ = Frag::embed("max($,$)", vec![Frag::raw("?")]);
    }

    #[test]
    fn values_renders_column_list_and_row_groups() {
        let frag = Frag::values(
            ["age", "foo"],
            vec![
                vec![Value::Int(23), Value::Text("bar".to_string())],
                vec![Value::Int(24), Value::Text("baz".to_string())],
            ],
        )
        .unwrap();
        check(
            &frag,
            "(age,foo) VALUES (?,?),(?,?)",
            &[
                Value::Int(23),
                Value::Text("bar".to_string()),
                Value::Int(24),
                Value::Text("baz".to_string()),
            ],
        );
    }

    #[test]
    fn values_without_columns_omits_column_list() {
        let frag = Frag::values(Vec::<String>::new(), vec![vec![Value::Int(1)]]).unwrap();
        check(&frag, "VALUES (?)", &[Value::Int(1)]);
    }

    #[test]
    fn values_rejects_empty_and_ragged_input() {
        assert_eq!(
            Frag::values(Vec::<String>::new(), vec![]).unwrap_err(),
            BuildError::EmptyRows
        );
        assert_eq!(
            Frag::values(Vec::<String>::new(), vec![vec![]]).unwrap_err(),
            BuildError::EmptyRow { row: 0 }
        );
        assert_eq!(
            Frag::values(
                Vec::<String>::new(),
                vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3)]],
            )
            .unwrap_err(),
            BuildError::RowLengthMismatch {
                row: 1,
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            Frag::values(["a"], vec![vec![Value::Int(1), Value::Int(2)]]).unwrap_err(),
            BuildError::ColumnCountMismatch {
                columns: 1,
                row_len: 2
            }
        );
    }

    #[test]
    fn assign_sorted_is_deterministic_across_insertion_orders() {
        let mut forward = HashMap::new();
        forward.insert("district".to_string(), Value::Int(50));
        forward.insert("score".to_string(), Value::Text("010".to_string()));

        let mut reverse = HashMap::new();
        reverse.insert("score".to_string(), Value::Text("010".to_string()));
        reverse.insert("district".to_string(), Value::Int(50));

        let a = Frag::assign_sorted(forward).render();
        let b = Frag::assign_sorted(reverse).render();
        assert_eq!(a.sql, "district=?,score=?");
        assert_eq!(a.args, vec![Value::Int(50), Value::Text("010".to_string())]);
        assert_eq!(a, b);
    }

    #[test]
    fn assign_keeps_marker_argument_parity() {
        let mut columns = HashMap::new();
        columns.insert("a".to_string(), Value::Int(1));
        columns.insert("b".to_string(), Value::Int(2));
        columns.insert("c".to_string(), Value::Int(3));

        // Column order is unspecified; parity and content are not.
        let q = Frag::assign(columns).render();
        assert_eq!(q.placeholders(), 3);
        assert_eq!(q.args.len(), 3);
        assert_eq!(q.sql.matches('=').count(), 3);
    }

    #[test]
    fn comparison_helpers_render_one_marker() {
        check(&Frag::eq("a", 1), "a = ?", &[Value::Int(1)]);
        check(&Frag::ne("a", 1), "a != ?", &[Value::Int(1)]);
        check(&Frag::gt("a", 1), "a > ?", &[Value::Int(1)]);
        check(&Frag::gte("a", 1), "a >= ?", &[Value::Int(1)]);
        check(&Frag::lt("a", 1), "a < ?", &[Value::Int(1)]);
        check(&Frag::lte("a", 1), "a <= ?", &[Value::Int(1)]);
    }
}
