use super::*;

/// Tests a permitted status transition.
///
/// Expected: pending sale becomes failed
#[tokio::test]
async fn transitions_from_allowed_state() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, _, sale) = factory::helpers::create_sale_with_dependencies(db).await?;

    let repo = SaleRepository::new(db);
    let changed = repo
        .transition(
            sale.id,
            &[SaleStatus::Pending],
            SaleStatus::Failed,
            Some("pay-9"),
        )
        .await?;

    assert!(changed);
    let stored = repo.find_by_id(sale.id).await?.unwrap();
    assert_eq!(stored.status, SaleStatus::Failed);
    assert_eq!(stored.payment_id.as_deref(), Some("pay-9"));

    Ok(())
}

/// Tests that a transition from a state not listed in `from` is refused.
///
/// Expected: false and the status unchanged
#[tokio::test]
async fn refuses_transition_from_other_state() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let sale = factory::sale::SaleFactory::new(db, user.id, &plan)
        .status(SaleStatus::Refunded)
        .build()
        .await?;

    let repo = SaleRepository::new(db);
    let changed = repo
        .transition(sale.id, &[SaleStatus::Pending], SaleStatus::Failed, None)
        .await?;

    assert!(!changed);
    let stored = repo.find_by_id(sale.id).await?.unwrap();
    assert_eq!(stored.status, SaleStatus::Refunded);

    Ok(())
}
