//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Factories take the ids of the rows they depend on, and
//! `helpers` creates whole dependency chains at once.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let user = factory::user::create_user(&db).await?;
//!     let plan = factory::plan::create_plan(&db).await?;
//!
//!     // Create with all dependencies
//!     let (user, plan, sale) = factory::helpers::create_sale_with_dependencies(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let user = factory::user::UserFactory::new(&db)
//!     .email("vip@example.com")
//!     .tier(UserTier::Vip)
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod plan;
pub mod sale;
pub mod signal;
pub mod subscription;
pub mod user;
pub mod webhook_event;

// Re-export commonly used factory functions for concise usage
pub use plan::create_plan;
pub use sale::create_sale;
pub use signal::create_signal;
pub use subscription::create_subscription;
pub use user::create_user;
pub use webhook_event::create_webhook_event;
