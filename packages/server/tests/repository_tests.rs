//! Postgres repository tests (need Docker: `cargo test -- --ignored`).

mod common;

use chrono::NaiveDate;
use common::*;
use contacts_core::common::Pagination;
use contacts_core::domains::contacts::{ContactInput, ContactRepository, PgContactRepository};
use contacts_core::domains::users::{
    DuplicateUser, NewUser, PgUserRepository, User, UserRepository,
};
use test_context::test_context;

async fn new_user(repo: &PgUserRepository) -> User {
    let username = PostgresHarness::unique("user_");
    repo.create(NewUser {
        email: format!("{}@example.com", username),
        username,
        hashed_password: "hash".to_string(),
    })
    .await
    .expect("create user")
}

fn input(first_name: &str) -> ContactInput {
    ContactInput {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        phone: "+380501234567".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        description: None,
    }
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn user_create_and_lookup(ctx: &PostgresHarness) {
    let repo = PgUserRepository::new(ctx.db_pool.clone());
    let user = new_user(&repo).await;

    assert!(!user.is_confirmed);
    assert_eq!(user.role, "user");
    assert_eq!(
        repo.find_by_email(&user.email).await.unwrap().unwrap().id,
        user.id
    );
    assert_eq!(
        repo.find_by_username(&user.username).await.unwrap().unwrap().id,
        user.id
    );
    assert!(repo.find_by_id(user.id).await.unwrap().is_some());
    repo.ping().await.unwrap();
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn user_duplicate_is_reported(ctx: &PostgresHarness) {
    let repo = PgUserRepository::new(ctx.db_pool.clone());
    let user = new_user(&repo).await;

    let err = repo
        .create(NewUser {
            email: user.email.clone(),
            username: PostgresHarness::unique("other_"),
            hashed_password: "hash".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.is::<DuplicateUser>());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn user_updates(ctx: &PostgresHarness) {
    let repo = PgUserRepository::new(ctx.db_pool.clone());
    let user = new_user(&repo).await;

    repo.confirm_email(&user.email).await.unwrap();
    repo.update_refresh_token(user.id, Some("f".repeat(64)))
        .await
        .unwrap();
    let updated = repo
        .update_avatar_url(&user.email, "https://example.com/a.png")
        .await
        .unwrap()
        .unwrap();

    assert!(updated.is_confirmed);
    assert_eq!(updated.avatar.as_deref(), Some("https://example.com/a.png"));
    assert_eq!(updated.refresh_token_hash, Some("f".repeat(64)));
    assert!(repo
        .update_avatar_url("ghost@example.com", "x")
        .await
        .unwrap()
        .is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn contact_crud_scoped_to_owner(ctx: &PostgresHarness) {
    let users = PgUserRepository::new(ctx.db_pool.clone());
    let contacts = PgContactRepository::new(ctx.db_pool.clone());
    let owner = new_user(&users).await;
    let stranger = new_user(&users).await;

    let created = contacts.create(owner.id, input("Anna")).await.unwrap();
    assert_eq!(created.user_id, owner.id);

    assert!(contacts
        .find_by_id(stranger.id, created.id)
        .await
        .unwrap()
        .is_none());
    assert!(contacts
        .update(stranger.id, created.id, input("Mallory"))
        .await
        .unwrap()
        .is_none());

    let updated = contacts
        .update(owner.id, created.id, input("Hanna"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.first_name, "Hanna");

    let removed = contacts.remove(owner.id, created.id).await.unwrap().unwrap();
    assert_eq!(removed.id, created.id);
    assert!(contacts
        .remove(owner.id, created.id)
        .await
        .unwrap()
        .is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn contact_list_and_search(ctx: &PostgresHarness) {
    let users = PgUserRepository::new(ctx.db_pool.clone());
    let contacts = PgContactRepository::new(ctx.db_pool.clone());
    let owner = new_user(&users).await;
    for name in ["Anna", "Joanna", "Boris"] {
        contacts.create(owner.id, input(name)).await.unwrap();
    }

    let page = contacts
        .list(owner.id, Pagination::new(1, 1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].first_name, "Joanna");
    assert_eq!(contacts.list_all(owner.id).await.unwrap().len(), 3);

    let found = contacts.search(owner.id, "ANNA").await.unwrap();
    assert_eq!(found.len(), 2);
    // Wildcards are matched literally
    assert!(contacts.search(owner.id, "%").await.unwrap().is_empty());
}
