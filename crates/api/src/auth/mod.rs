//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- typed access/refresh JWT generation and validation.
//! - [`header`] -- `Basic` and `Bearer` authorization header parsing.

pub mod header;
pub mod jwt;
pub mod password;
