use super::*;

/// Tests settling a signal.
///
/// Expected: result persisted, other fields unchanged
#[tokio::test]
async fn settles_signal() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_signal_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let admin = factory::user::create_admin(db).await?;
    let signal = factory::create_signal(db, admin.id).await?;

    let repo = SignalRepository::new(db);
    let settled = repo
        .set_result(signal.id, SignalResult::Won)
        .await?
        .unwrap();

    assert_eq!(settled.result, SignalResult::Won);
    assert_eq!(settled.title, signal.title);

    Ok(())
}
