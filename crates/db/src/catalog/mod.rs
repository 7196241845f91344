//! Movie aggregate operations built on top of the repositories.

pub mod query;
pub mod writer;

pub use query::MovieQuery;
pub use writer::MovieWriter;
