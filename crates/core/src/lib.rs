//! Domain types and pure logic for the Marquee movie catalog.
//!
//! Nothing in this crate touches the database or the network, so it can be
//! shared by the repository layer, the HTTP layer and any future tooling.

pub mod cursor;
pub mod error;
pub mod genre_set;
pub mod pagination;
pub mod roles;
pub mod sort;
pub mod types;
