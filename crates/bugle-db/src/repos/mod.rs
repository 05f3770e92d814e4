//! Repository modules implementing the tracker operations.
//!
//! Each module adds methods to `TrackerService` via `impl TrackerService`
//! blocks.

pub mod intake;
pub mod member;
pub mod project;
pub mod session;
pub mod ticket;
pub mod user;
