//! Pagination module
//!
//! Page-number pagination with a configurable stop condition. The default
//! walks pages 1, 2, 3, ... and stops at the first empty page.

mod strategies;
mod types;

pub use strategies::{
    PageNumberPaginator, DEFAULT_PAGE_PARAM, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_PARAM,
};
pub use types::{
    check_stop_condition, NextPage, PaginationState, Paginator, StopCondition, StopResult,
};
