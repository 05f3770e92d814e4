//! # bugle-core
//!
//! Core types for the Bugle issue-tracking backend.
//!
//! This crate provides the foundational types shared across all Bugle crates:
//! - Entity structs for the domain objects (users, projects, memberships, tickets)
//! - Closed enums with static label mappings for every choice set
//! - ID prefix constants

pub mod entities;
pub mod enums;
pub mod ids;
