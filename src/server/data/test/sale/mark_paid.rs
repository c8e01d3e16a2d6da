use super::*;

/// Tests marking a pending sale paid.
///
/// Expected: true with payment id and paid_at stored
#[tokio::test]
async fn marks_pending_sale_paid() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, _, sale) = factory::helpers::create_sale_with_dependencies(db).await?;
    let paid_at = Utc::now();

    let repo = SaleRepository::new(db);
    assert!(repo.mark_paid(sale.id, "pay-1", paid_at).await?);

    let stored = repo.find_by_id(sale.id).await?.unwrap();
    assert_eq!(stored.status, SaleStatus::Paid);
    assert_eq!(stored.payment_id.as_deref(), Some("pay-1"));
    assert!(stored.paid_at.is_some());

    Ok(())
}

/// Tests that marking an already paid sale is a no-op.
///
/// Expected: false and the original payment id kept
#[tokio::test]
async fn does_not_repay_paid_sale() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let sale = factory::sale::SaleFactory::new(db, user.id, &plan)
        .status(SaleStatus::Paid)
        .payment_id("pay-original")
        .paid_at(Utc::now())
        .build()
        .await?;

    let repo = SaleRepository::new(db);
    assert!(!repo.mark_paid(sale.id, "pay-other", Utc::now()).await?);

    let stored = repo.find_by_id(sale.id).await?.unwrap();
    assert_eq!(stored.payment_id.as_deref(), Some("pay-original"));

    Ok(())
}

/// Tests that a late approval does not resurrect a refunded sale.
///
/// Expected: false and status still refunded
#[tokio::test]
async fn does_not_pay_refunded_sale() -> Result<(), DbErr> {
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
    assert!(!repo.mark_paid(sale.id, "pay-late", Utc::now()).await?);

    let stored = repo.find_by_id(sale.id).await?.unwrap();
    assert_eq!(stored.status, SaleStatus::Refunded);

    Ok(())
}
