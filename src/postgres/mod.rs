//! PostgreSQL dialect: query builder and the transforms that rely on
//! PostgreSQL functions.

pub mod condition;
pub mod email;
pub mod json;
pub mod null;
pub mod overlay;
pub mod query_builder;
pub mod regex;
pub mod sha256;
pub mod text;

pub use condition::{Condition, Operator, When};
pub use email::{Email, EmailBuilder};
pub use json::RemoveJsonKeys;
pub use null::Null;
pub use overlay::Overlay;
pub use query_builder::PostgresQueryBuilder;
pub use regex::RegexReplace;
pub use sha256::Sha256;
pub use text::TextScramble;
