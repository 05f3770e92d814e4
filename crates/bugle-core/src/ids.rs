//! ID prefix constants.
//!
//! Every row gets a prefixed random ID such as `tkt-a3f8b2c1` (3-char prefix,
//! dash, 8 hex chars). The random part is generated in SQL by the store.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_TICKET: &str = "tkt";
pub const PREFIX_MEMBER: &str = "mbr";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_PROJECT, PREFIX_TICKET, PREFIX_MEMBER];
