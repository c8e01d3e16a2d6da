use super::*;

/// Tests paginating users ordered by email.
///
/// Verifies that the page contains the expected slice and that the total counts
/// all users rather than pages.
///
/// Expected: Ok with 2 items on the first page and total of 3
#[tokio::test]
async fn paginates_users_by_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for email in ["carol@example.com", "alice@example.com", "bob@example.com"] {
        factory::user::UserFactory::new(db).email(email).build().await?;
    }

    let repo = UserRepository::new(db);
    let page = repo
        .get_all_paginated(PageParam {
            page: 0,
            per_page: 2,
        })
        .await?;

    let emails: Vec<_> = page.items.iter().map(|user| user.email.as_str()).collect();
    assert_eq!(emails, vec!["alice@example.com", "bob@example.com"]);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);

    let second = repo
        .get_all_paginated(PageParam {
            page: 1,
            per_page: 2,
        })
        .await?;
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].email, "carol@example.com");

    Ok(())
}
