use super::*;

/// Tests listing only active plans, cheapest first.
///
/// Expected: Ok with the two active plans ordered by price
#[tokio::test]
async fn lists_active_plans_by_price() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Plan)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let yearly = factory::plan::PlanFactory::new(db)
        .price_cents(19900)
        .duration_days(365)
        .build()
        .await?;
    let monthly = factory::plan::PlanFactory::new(db)
        .price_cents(2990)
        .build()
        .await?;
    factory::plan::PlanFactory::new(db)
        .price_cents(100)
        .active(false)
        .build()
        .await?;

    let repo = PlanRepository::new(db);
    let plans = repo.get_active().await?;

    let ids: Vec<_> = plans.iter().map(|plan| plan.id).collect();
    assert_eq!(ids, vec![monthly.id, yearly.id]);
    assert_eq!(repo.get_all().await?.len(), 3);

    Ok(())
}
