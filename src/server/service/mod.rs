//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating repository calls with the payment gateway and mail
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//! - **Transaction Management**: Keeping sale, subscription and tier changes atomic

pub mod admin_code;
pub mod auth;
pub mod mail;
pub mod payment;
pub mod plan;
pub mod sale;
pub mod signal;
pub mod subscription;
pub mod user;
pub mod vip_activation;
pub mod webhook;
