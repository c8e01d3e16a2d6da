use super::*;

/// Tests the per-status counts and paid revenue aggregation.
///
/// Expected: every status reported, revenue summed from paid sales only
#[tokio::test]
async fn aggregates_counts_and_revenue() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let plan = factory::plan::PlanFactory::new(db)
        .price_cents(1000)
        .build()
        .await?;

    for status in [SaleStatus::Paid, SaleStatus::Paid, SaleStatus::Failed] {
        factory::sale::SaleFactory::new(db, user.id, &plan)
            .status(status)
            .build()
            .await?;
    }
    factory::create_sale(db, user.id, &plan).await?;

    let repo = SaleRepository::new(db);
    let counts = repo.count_by_status().await?;
    assert_eq!(
        counts,
        vec![
            (SaleStatus::Pending, 1),
            (SaleStatus::Paid, 2),
            (SaleStatus::Failed, 1),
            (SaleStatus::Refunded, 0),
        ]
    );

    let revenue = repo.paid_revenue_by_currency().await?;
    assert_eq!(revenue, vec![("BRL".to_string(), 2000)]);

    let paid = repo
        .get_paginated(
            Some(SaleStatus::Paid),
            PageParam {
                page: 0,
                per_page: 10,
            },
        )
        .await?;
    assert_eq!(paid.total, 2);

    Ok(())
}
