use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20250301_000001_create_user_table::User, m20250302_000004_create_plan_table::Plan,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sale::Table)
                    .if_not_exists()
                    .col(pk_auto(Sale::Id))
                    .col(integer(Sale::UserId))
                    .col(integer(Sale::PlanId))
                    .col(string_uniq(Sale::Reference))
                    .col(string_null(Sale::CheckoutId))
                    .col(string_null(Sale::PaymentId))
                    .col(big_integer(Sale::AmountCents))
                    .col(string(Sale::Currency))
                    .col(text(Sale::Status).default("pending"))
                    .col(
                        timestamp_with_time_zone(Sale::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Sale::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Sale::PaidAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_user_id")
                            .from(Sale::Table, Sale::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_plan_id")
                            .from(Sale::Table, Sale::PlanId)
                            .to(Plan::Table, Plan::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sale_user_id")
                    .table(Sale::Table)
                    .col(Sale::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sale::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Sale {
    Table,
    Id,
    UserId,
    PlanId,
    Reference,
    CheckoutId,
    PaymentId,
    AmountCents,
    Currency,
    Status,
    CreatedAt,
    UpdatedAt,
    PaidAt,
}
