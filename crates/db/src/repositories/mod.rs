//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods take any [`sqlx::PgExecutor`] as the first argument, so the same
//! call works against `&PgPool` or against the connection of an open
//! [`UnitOfWork`](crate::unit_of_work::UnitOfWork).

pub mod director_repo;
pub mod genre_repo;
pub mod movie_detail_repo;
pub mod movie_repo;
pub mod user_repo;

pub use director_repo::DirectorRepo;
pub use genre_repo::GenreRepo;
pub use movie_detail_repo::MovieDetailRepo;
pub use movie_repo::MovieRepo;
pub use user_repo::UserRepo;
