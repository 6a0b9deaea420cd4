//! Data structures shared across the migration core

pub mod legacy;

pub use legacy::{ZimbraContact, ZimbraContactGroupMember, ZimbraFolder};
