use super::*;

/// Tests creating a pending sale and finding it by reference.
///
/// Expected: Ok with status pending and no payment recorded
#[tokio::test]
async fn creates_pending_sale() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;

    let repo = SaleRepository::new(db);
    let sale = repo
        .create(CreateSaleParam {
            user_id: user.id,
            plan_id: plan.id,
            reference: "ref-abc".to_string(),
            amount_cents: plan.price_cents,
            currency: plan.currency.clone(),
        })
        .await?;

    assert_eq!(sale.status, SaleStatus::Pending);
    assert!(sale.payment_id.is_none());
    assert!(sale.paid_at.is_none());
    assert_eq!(repo.find_by_reference("ref-abc").await?, Some(sale));

    Ok(())
}

/// Tests listing a user's sales newest first with pagination.
///
/// Expected: only the user's own sales, most recent first
#[tokio::test]
async fn lists_sales_of_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (user, plan, first) = factory::helpers::create_sale_with_dependencies(db).await?;
    let second = factory::create_sale(db, user.id, &plan).await?;
    let other = factory::create_user(db).await?;
    factory::create_sale(db, other.id, &plan).await?;

    let repo = SaleRepository::new(db);
    let page = repo
        .get_by_user_paginated(
            user.id,
            PageParam {
                page: 0,
                per_page: 10,
            },
        )
        .await?;

    assert_eq!(page.total, 2);
    let ids: Vec<_> = page.items.iter().map(|sale| sale.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}
