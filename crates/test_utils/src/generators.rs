//! Fake-data helpers
//!
//! Thin wrappers over `fake` for tests that want plausible but throwaway
//! values rather than hand-written literals.

use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

pub fn fake_email() -> String {
    SafeEmail().fake()
}

pub fn fake_first_name() -> String {
    FirstName().fake()
}

pub fn fake_last_name() -> String {
    LastName().fake()
}

pub fn fake_company_name() -> String {
    CompanyName().fake()
}
