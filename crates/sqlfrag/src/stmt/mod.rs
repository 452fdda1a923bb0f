//! Statement composers assembling full SQL statements in canonical clause
//! order.
//!
//! Each composer owns its clause fragments and renders them in a fixed
//! order, appending clause arguments to the running sequence strictly in
//! that order so markers and arguments stay in lock-step across clause
//! boundaries. Optional clauses are included only when present and not
//! empty; an empty AND/OR filter omits its clause keyword entirely.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::{Select, SelectExpr, UnionAll};
pub use update::Update;

use crate::frag::Frag;
use crate::value::Value;

/// Append `keyword` plus the rendered fragment, or nothing when the clause
/// is absent or empty.
pub(crate) fn push_clause(
    sql: &mut String,
    args: &mut Vec<Value>,
    keyword: &str,
    clause: Option<&Frag>,
) {
    let Some(clause) = clause else { return };
    if clause.is_empty() {
        return;
    }
    sql.push_str(keyword);
    sql.push_str(&clause.build_into(args));
}
