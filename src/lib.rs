//! # shroud: anonymized views over a live schema
//!
//! shroud creates one read-only view per table, `<table>_anonymized`,
//! where configured columns go through an anonymizing SQL expression and
//! every other column passes through unchanged.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use shroud::prelude::*;
//!
//! let users = Table::builder()
//!     .transform("email", Email::new())
//!     .transform("name", Static::new("anonymous", "TEXT"))
//!     .build();
//!
//! let generator = Generator::builder(PostgresQueryBuilder)
//!     .table("users", users)
//!     .build();
//!
//! let db = Database::connect("postgres://localhost/mydb").await?;
//! generator.clear_views(&db).await?;
//! // ... migrations
//! generator.create_views(&db).await?;
//! ```
//!
//! ## Transforms
//!
//! | Transform        | Result                                          |
//! |------------------|-------------------------------------------------|
//! | `Noop`           | column as is (default)                          |
//! | `Static`         | the same typed literal for every row            |
//! | `Null`           | `NULL`                                          |
//! | `Overlay`        | a window of the text overwritten by a pattern   |
//! | `RegexReplace`   | first regex match replaced                      |
//! | `RemoveJsonKeys` | JSON object without the given keys              |
//! | `Sha256`         | truncated hex digest of the value               |
//! | `Email`          | local part (optionally domain) hashed           |
//! | `TextScramble`   | characters substituted by a random permutation  |
//! | `Condition`      | `CASE` over other transforms                    |

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod postgres;
pub mod table;
pub mod transform;

pub mod prelude {
    pub use crate::config::{Config, TransformSpec};
    pub use crate::engine::{Database, SchemaExecutor};
    pub use crate::error::*;
    pub use crate::generator::{DEFAULT_VIEW_SUFFIX, Generator, QueryBuilder, ViewPlan};
    pub use crate::postgres::*;
    pub use crate::table::{Table, TableBuilder};
    pub use crate::transform::{Noop, Static, Transform, full_column_name};
}

/// The SQL fragment a transform produces for `table.column`.
///
/// # Example
///
/// ```
/// use shroud::transform::Static;
///
/// assert_eq!(shroud::emit(&Static::new("x", "TEXT"), "users", "name"), "'x'::TEXT");
/// ```
pub fn emit(transform: &dyn transform::Transform, table: &str, column: &str) -> String {
    transform.emit(table, column)
}
