pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_table;
mod m20250301_000002_create_user_token_table;
mod m20250301_000003_create_refresh_token_table;
mod m20250302_000004_create_plan_table;
mod m20250302_000005_create_sale_table;
mod m20250302_000006_create_subscription_table;
mod m20250303_000007_create_signal_table;
mod m20250304_000008_create_webhook_event_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_table::Migration),
            Box::new(m20250301_000002_create_user_token_table::Migration),
            Box::new(m20250301_000003_create_refresh_token_table::Migration),
            Box::new(m20250302_000004_create_plan_table::Migration),
            Box::new(m20250302_000005_create_sale_table::Migration),
            Box::new(m20250302_000006_create_subscription_table::Migration),
            Box::new(m20250303_000007_create_signal_table::Migration),
            Box::new(m20250304_000008_create_webhook_event_table::Migration),
        ]
    }
}
