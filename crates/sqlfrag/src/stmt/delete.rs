//! DELETE statement composer.

use tracing::trace;

use crate::frag::Frag;
use crate::query::{Query, Render};
use crate::stmt::push_clause;

/// `DELETE FROM table [WHERE cond]`.
///
/// ```
/// use sqlfrag::{Delete, Frag, Render};
///
/// let q = Delete::new(Frag::raw("tb")).filter(Frag::eq("id", 3)).render();
/// assert_eq!(q.sql, "DELETE FROM tb WHERE id = ?");
/// assert_eq!(q.args.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Delete {
    table: Frag,
    filter: Option<Frag>,
}

impl Delete {
    /// Create a DELETE for the given table.
    pub fn new(table: Frag) -> Self {
        Self {
            table,
            filter: None,
        }
    }

    /// Set the WHERE clause.
    pub fn filter(mut self, cond: Frag) -> Self {
        self.filter = Some(cond);
        self
    }
}

impl Render for Delete {
    fn render(&self) -> Query {
        let mut args = Vec::new();
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(&self.table.build_into(&mut args));
        push_clause(&mut sql, &mut args, " WHERE ", self.filter.as_ref());
        let query = Query { sql, args };
        trace!(sql = %query.sql, args = query.args.len(), "rendered DELETE");
        query
    }
}
