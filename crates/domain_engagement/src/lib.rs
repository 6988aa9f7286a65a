//! Engagement domain - activity objects (tasks, calls, emails, meetings, notes)

pub mod ops;

pub use ops::{
    create_engagement, delete_engagement, get_engagement, get_engagements, CreateEngagementParams,
};
