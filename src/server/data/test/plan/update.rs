use super::*;

/// Tests updating the editable fields of a plan.
///
/// Expected: Ok(Some) with new values and unchanged code
#[tokio::test]
async fn updates_plan_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Plan)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let plan = factory::create_plan(db).await?;

    let repo = PlanRepository::new(db);
    let updated = repo
        .update(UpdatePlanParam {
            id: plan.id,
            name: "Renamed".to_string(),
            description: Some("Now with analysis".to_string()),
            price_cents: 3990,
            duration_days: 45,
            active: false,
        })
        .await?
        .unwrap();

    assert_eq!(updated.code, plan.code);
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.price_cents, 3990);
    assert_eq!(updated.duration_days, 45);
    assert!(!updated.active);

    Ok(())
}

/// Tests updating a plan that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_plan() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Plan)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = PlanRepository::new(db);
    let result = repo
        .update(UpdatePlanParam {
            id: 999,
            name: "Ghost".to_string(),
            description: None,
            price_cents: 1,
            duration_days: 1,
            active: true,
        })
        .await?;

    assert!(result.is_none());

    Ok(())
}
