//! INSERT statement composer.

use tracing::trace;

use crate::frag::Frag;
use crate::query::{Query, Render};

/// `INSERT INTO table <values>`.
///
/// The values clause is required; build it with [`Frag::values`] for
/// validated rectangular rows.
///
/// ```
/// use sqlfrag::{Frag, Insert, Render, Value};
///
/// let rows = vec![vec![Value::from(23), Value::from("bar")]];
/// let q = Insert::new(Frag::raw("tb"), Frag::values(["age", "foo"], rows)?).render();
/// assert_eq!(q.sql, "INSERT INTO tb (age,foo) VALUES (?,?)");
/// assert_eq!(q.args.len(), 2);
/// # Ok::<(), sqlfrag::BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Insert {
    table: Frag,
    values: Frag,
}

impl Insert {
    /// Create an INSERT with its required table and values clause.
    pub fn new(table: Frag, values: Frag) -> Self {
        Self { table, values }
    }
}

impl Render for Insert {
    fn render(&self) -> Query {
        let mut args = Vec::new();
        let mut sql = String::from("INSERT INTO ");
        sql.push_str(&self.table.build_into(&mut args));
        sql.push(' ');
        sql.push_str(&self.values.build_into(&mut args));
        let query = Query { sql, args };
        trace!(sql = %query.sql, args = query.args.len(), "rendered INSERT");
        query
    }
}
