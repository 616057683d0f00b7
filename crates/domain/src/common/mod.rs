//! Common types and helpers shared by every domain record.
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Minimal dependencies** - serde only

pub mod page;
pub mod string;

pub use page::{Page, PagedQuery, SortDirection};
pub use string::{non_blank, truncate_chars};
