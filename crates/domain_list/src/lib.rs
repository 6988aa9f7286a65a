//! List domain - static-list creation and deletion
//!
//! Membership changes live with the contact domain; this crate covers the
//! lists themselves.

pub mod ops;

pub use ops::{create_static_list, delete_list, CreateStaticListParams};
