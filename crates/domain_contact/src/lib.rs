//! Contact domain - operations against the CRM's contact object type
//!
//! Includes the legacy v1 static-list membership calls, which operate on
//! contacts rather than on lists themselves.

pub mod lists;
pub mod ops;

pub use lists::{add_contact_to_list, remove_contact_from_list};
pub use ops::{
    create_contact, delete_contact_by_email, delete_contact_by_id, get_all_contacts,
    get_contact_by_email, get_recent_contacts, search_contacts, update_contact_by_email,
    CreateContactParams, RecentContactsParams, SearchContactsParams, UpdateContactByEmailParams,
};
