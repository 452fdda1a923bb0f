//! # sqlfrag
//!
//! Composable parameterized SQL fragments.
//!
//! A query is assembled as an immutable tree of [`Frag`] nodes and rendered
//! once (or idempotently many times) into a [`Query`]: SQL text containing
//! one `?` marker per argument, paired with the arguments in marker order.
//! The pair is handed to whatever execution layer binds arguments
//! positionally; this crate never talks to a database itself.
//!
//! ## Guarantees
//!
//! - **Marker/argument parity**: for every tree built through the crate's
//!   constructors, the number of `?` markers equals the argument count and
//!   their orders match.
//! - **Null-elision**: an AND/OR group whose children are all absent is
//!   itself absent, and statement composers omit the owning clause instead
//!   of rendering `WHERE ()`.
//! - **Purity**: rendering is a read-only traversal; concurrent renders of a
//!   shared tree are safe. The unordered assignment set is the one
//!   documented source of nondeterminism, and only across separately
//!   constructed maps.
//!
//! ## Example
//!
//! ```
//! use sqlfrag::{Frag, Render, Select};
//!
//! let query = Select::new(Frag::raw("tb"))
//!     .fields(["name", "age"])
//!     .filter(Frag::in_list("age", [1, 2, 3])?)
//!     .render();
//!
//! assert_eq!(query.sql, "SELECT name,age FROM tb WHERE age IN (?,?,?)");
//! assert_eq!(query.args.len(), 3);
//! # Ok::<(), sqlfrag::BuildError>(())
//! ```
//!
//! Optional filters compose without special-casing absence at every call
//! site: an empty group simply disappears.
//!
//! ```
//! use sqlfrag::{Frag, Render, Select};
//!
//! let filters: Vec<Frag> = Vec::new();
//! let query = Select::new(Frag::raw("tb")).filter(Frag::and(filters)).render();
//! assert_eq!(query.sql, "SELECT * FROM tb");
//! ```

pub mod error;
pub mod frag;
pub mod query;
pub mod stmt;
pub mod value;

pub use error::{BuildError, BuildResult};
pub use frag::{CaseWhen, Frag, JoinKind};
pub use query::{Query, Render};
pub use stmt::{Delete, Insert, Select, SelectExpr, UnionAll, Update};
pub use value::Value;
