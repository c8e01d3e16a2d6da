use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Signal::Table)
                    .if_not_exists()
                    .col(pk_auto(Signal::Id))
                    .col(integer(Signal::AuthorId))
                    .col(string(Signal::Title))
                    .col(string(Signal::Competition))
                    .col(string(Signal::EventName))
                    .col(string(Signal::Market))
                    .col(string(Signal::Pick))
                    .col(double(Signal::Odds))
                    .col(double_null(Signal::StakeUnits))
                    .col(text_null(Signal::Analysis))
                    .col(text(Signal::Tier).default("free"))
                    .col(text(Signal::Result).default("pending"))
                    .col(timestamp_with_time_zone(Signal::StartsAt))
                    .col(
                        timestamp_with_time_zone(Signal::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Signal::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_signal_author_id")
                            .from(Signal::Table, Signal::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Signal::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Signal {
    Table,
    Id,
    AuthorId,
    Title,
    Competition,
    EventName,
    Market,
    Pick,
    Odds,
    StakeUnits,
    Analysis,
    Tier,
    Result,
    StartsAt,
    CreatedAt,
    UpdatedAt,
}
