use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WebhookEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(WebhookEvent::Id))
                    .col(string_uniq(WebhookEvent::ProviderEventId))
                    .col(string(WebhookEvent::EventType))
                    .col(string_null(WebhookEvent::Action))
                    .col(string_null(WebhookEvent::ResourceId))
                    .col(text(WebhookEvent::Payload))
                    .col(text(WebhookEvent::Status).default("pending"))
                    .col(integer(WebhookEvent::RetryCount).default(0))
                    .col(text_null(WebhookEvent::LastError))
                    .col(
                        timestamp_with_time_zone(WebhookEvent::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(WebhookEvent::ProcessedAt))
                    .to_owned(),
            )
            .await?;

        // The poller scans by status oldest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_webhook_event_status_created_at")
                    .table(WebhookEvent::Table)
                    .col(WebhookEvent::Status)
                    .col(WebhookEvent::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WebhookEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WebhookEvent {
    Table,
    Id,
    ProviderEventId,
    EventType,
    Action,
    ResourceId,
    Payload,
    Status,
    RetryCount,
    LastError,
    CreatedAt,
    ProcessedAt,
}
