use super::*;

/// Tests listing signals newest first with an optional tier filter.
///
/// Expected: all signals newest first; only VIP ones when filtered
#[tokio::test]
async fn lists_newest_first_with_tier_filter() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_signal_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let admin = factory::user::create_admin(db).await?;
    let first = factory::create_signal(db, admin.id).await?;
    let second = factory::signal::SignalFactory::new(db, admin.id)
        .tier(UserTier::Vip)
        .build()
        .await?;

    let repo = SignalRepository::new(db);
    let page = PageParam {
        page: 0,
        per_page: 10,
    };

    let all = repo.get_paginated(None, page).await?;
    let ids: Vec<_> = all.items.iter().map(|signal| signal.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let vip = repo.get_paginated(Some(UserTier::Vip), page).await?;
    assert_eq!(vip.total, 1);
    assert_eq!(vip.items[0].id, second.id);

    Ok(())
}
