//! UPDATE statement composer.

use tracing::trace;

use crate::frag::Frag;
use crate::query::{Query, Render};
use crate::stmt::push_clause;

/// `UPDATE table SET assignments [WHERE cond]`.
///
/// The SET clause is required at construction: an UPDATE without
/// assignments is syntactically incomplete SQL, so missing SET is treated
/// as a caller error rather than an elided optional clause (unlike WHERE).
///
/// ```
/// use std::collections::HashMap;
/// use sqlfrag::{Frag, Render, Update, Value};
///
/// let mut set = HashMap::new();
/// set.insert("score".to_string(), Value::from(99));
///
/// let q = Update::new(Frag::raw("tb"), Frag::assign_sorted(set))
///     .filter(Frag::eq("id", 7))
///     .render();
/// assert_eq!(q.sql, "UPDATE tb SET score=? WHERE id = ?");
/// assert_eq!(q.args.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Update {
    table: Frag,
    set: Frag,
    filter: Option<Frag>,
}

impl Update {
    /// Create an UPDATE with its required table and SET clause.
    pub fn new(table: Frag, set: Frag) -> Self {
        Self {
            table,
            set,
            filter: None,
        }
    }

    /// Set the WHERE clause.
    pub fn filter(mut self, cond: Frag) -> Self {
        self.filter = Some(cond);
        self
    }
}

impl Render for Update {
    fn render(&self) -> Query {
        let mut args = Vec::new();
        let mut sql = String::from("UPDATE ");
        sql.push_str(&self.table.build_into(&mut args));
        sql.push_str(" SET ");
        sql.push_str(&self.set.build_into(&mut args));
        push_clause(&mut sql, &mut args, " WHERE ", self.filter.as_ref());
        let query = Query { sql, args };
        trace!(sql = %query.sql, args = query.args.len(), "rendered UPDATE");
        query
    }
}
