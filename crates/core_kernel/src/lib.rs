//! Core Kernel - Foundational types for the CRM bridge
//!
//! This crate provides the fundamental building blocks used across all domain
//! and infrastructure crates:
//! - The error taxonomy shared by every outbound operation
//! - The uniform `{result, error}` envelope returned to callers
//! - The operation catalog (argument requirements and defaults)
//! - The transport port that outbound adapters implement
//! - Cursor-following pagination over paged CRM listings
//! - The filter-group payload builder shared by search endpoints

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod paging;
pub mod ports;
pub mod search;

pub use catalog::{OperationCatalog, OperationSpec};
pub use envelope::Envelope;
pub use error::CrmError;
pub use paging::{collect_all, Page};
pub use ports::{ApiRequest, ApiResponse, CrmTransport, HttpMethod};
pub use search::{Filter, SearchPayload};
