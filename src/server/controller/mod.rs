//! HTTP request handlers.
//!
//! Controllers authenticate the caller through `AuthGuard`, convert DTOs into
//! server-side params, call a service and convert the returned domain model back into a
//! DTO. Every handler carries a `utoipa::path` annotation for the OpenAPI document.

pub mod admin;
pub mod auth;
pub mod plan;
pub mod sale;
pub mod signal;
pub mod user;
pub mod webhook;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::{model::pagination::PageParam, util::parse::page_param};

/// Pagination query shared by list endpoints.
#[derive(Deserialize, IntoParams)]
pub struct PageQuery {
    /// Zero-indexed page number (default: 0)
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn into_param(self) -> PageParam {
        page_param(self.page, self.per_page)
    }
}
