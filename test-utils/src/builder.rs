use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{User, Sale};
///
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(Sale)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables with foreign keys should be added after the tables they
    /// reference.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the user table and both token tables.
    ///
    /// Use this when testing registration, login, verification, password reset or
    /// refresh-token rotation.
    pub fn with_auth_tables(self) -> Self {
        self.with_table(User)
            .with_table(UserToken)
            .with_table(RefreshToken)
    }

    /// Adds all tables required for billing operations.
    ///
    /// Adds in dependency order:
    /// - User
    /// - Plan
    /// - Sale
    /// - Subscription
    pub fn with_billing_tables(self) -> Self {
        self.with_table(User)
            .with_table(Plan)
            .with_table(Sale)
            .with_table(Subscription)
    }

    /// Adds the billing tables plus the webhook event queue.
    ///
    /// Equivalent to `with_billing_tables()` followed by `with_table(WebhookEvent)`.
    pub fn with_webhook_tables(self) -> Self {
        self.with_billing_tables().with_table(WebhookEvent)
    }

    /// Adds the user and signal tables.
    pub fn with_signal_tables(self) -> Self {
        self.with_table(User).with_table(Signal)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
