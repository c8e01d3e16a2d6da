//! Request and response DTOs of the HTTP API.

pub mod api;
pub mod auth;
pub mod plan;
pub mod sale;
pub mod signal;
pub mod subscription;
pub mod user;
pub mod webhook;
