use super::*;

/// Tests creating a plan and reading it back by code.
///
/// Expected: Ok with the plan active and findable by code
#[tokio::test]
async fn creates_active_plan() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Plan)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PlanRepository::new(db);
    let plan = repo
        .create(CreatePlanParam {
            code: "vip-monthly".to_string(),
            name: "VIP Monthly".to_string(),
            description: Some("All VIP tips".to_string()),
            price_cents: 2990,
            currency: "BRL".to_string(),
            duration_days: 30,
        })
        .await?;

    assert!(plan.active);
    assert_eq!(repo.find_by_code("vip-monthly").await?, Some(plan));

    Ok(())
}

/// Tests that plan codes are unique.
///
/// Expected: Err on the duplicate insert
#[tokio::test]
async fn rejects_duplicate_code() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Plan)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::plan::PlanFactory::new(db)
        .code("vip-monthly")
        .build()
        .await?;

    let repo = PlanRepository::new(db);
    let result = repo
        .create(CreatePlanParam {
            code: "vip-monthly".to_string(),
            name: "Again".to_string(),
            description: None,
            price_cents: 100,
            currency: "BRL".to_string(),
            duration_days: 7,
        })
        .await;

    assert!(result.is_err());

    Ok(())
}
