//! Deal domain - operations against the CRM's deal object type

pub mod ops;

pub use ops::{
    create_deal, delete_deal, get_all_deals, get_deal_by_id, get_deal_pipelines,
    get_deals_by_filters, get_recent_deals, search_deals, update_deal, CreateDealParams,
    DealFiltersParams, RecentDealsParams, SearchDealsParams, UpdateDealParams,
};
