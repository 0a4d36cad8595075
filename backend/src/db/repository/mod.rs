//! Repository traits and error types.

pub mod error;
pub mod schedule;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use schedule::ScheduleRepository;
