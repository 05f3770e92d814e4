//! Entity structs for the Bugle domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and
//! schema export.

mod member;
mod project;
mod ticket;
mod user;

pub use member::ProjectMember;
pub use project::Project;
pub use ticket::Ticket;
pub use user::User;
