//! The rendered (SQL, arguments) pair and the render capability.

use crate::value::Value;

/// A rendered statement or fragment: SQL text plus its ordered arguments.
///
/// This pair is the entire contract toward the execution layer: the text
/// contains one `?` marker per argument, and marker `#i` must be bound to
/// `args[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SQL text with `?` placeholder markers.
    pub sql: String,
    /// Arguments in marker occurrence order.
    pub args: Vec<Value>,
}

impl Query {
    /// Count the `?` placeholder markers in the rendered text.
    ///
    /// For every tree built through the crate's constructors this equals
    /// `self.args.len()`; raw fragments are the caller's responsibility.
    pub fn placeholders(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Render a fragment tree into its final `(sql, args)` pair.
///
/// Rendering is a pure traversal over immutable data: it may be invoked
/// repeatedly and concurrently with identical results. The one documented
/// exception is the unordered assignment set, whose column order is fixed at
/// construction from a hash map's iteration order and may differ between two
/// logically equal maps.
pub trait Render {
    /// Produce the rendered text and its ordered argument sequence.
    fn render(&self) -> Query;
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self) -> Query {
        (**self).render()
    }
}
