//! Submitted-payload types for partial and full updates.
//!
//! These are explicit merge inputs: the service combines them with the
//! stored row instead of mutating request payloads in place.

pub mod project;
pub mod ticket;
