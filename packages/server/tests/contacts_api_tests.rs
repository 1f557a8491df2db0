//! Integration tests for the /api/contacts routes.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::{json, Value};
use test_context::test_context;

async fn create(ctx: &TestHarness, token: &str, first_name: &str, birth_date: &str) -> Value {
    let res = ctx
        .post_json(
            "/api/contacts",
            Some(token),
            contact_body(first_name, birth_date),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "create failed: {:?}", res);
    res.body
}

fn first_names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|c| c["first_name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn contacts_require_authentication(ctx: &TestHarness) {
    let res = ctx.get("/api/contacts", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.detail(), "Not authenticated");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_and_read_contact(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;

    let created = create(ctx, &token, "Anna", "1990-05-17").await;
    assert_eq!(created["first_name"], "Anna");
    assert_eq!(created["birth_date"], "1990-05-17");
    assert_eq!(created["description"], "test contact");
    let id = created["id"].as_i64().unwrap();

    let res = ctx.get(&format!("/api/contacts/{}", id), Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, created);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_contact_without_description(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;
    let res = ctx
        .post_json(
            "/api/contacts",
            Some(&token),
            json!({
                "first_name": "Anna",
                "last_name": "Tester",
                "email": "anna@example.com",
                "phone": "123",
                "birth_date": "1990-05-17"
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body["description"].is_null());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_contact_validation(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;

    let mut body = contact_body("Anna", "1990-05-17");
    body["email"] = json!("not-an-email");
    let res = ctx.post_json("/api/contacts", Some(&token), body).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = contact_body("Anna", "1990-05-17");
    body["birth_date"] = json!("17.05.1990");
    let res = ctx.post_json("/api/contacts", Some(&token), body).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = contact_body("Anna", "1990-05-17");
    body["first_name"] = json!("x".repeat(31));
    let res = ctx.post_json("/api/contacts", Some(&token), body).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_contacts_with_pagination(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;
    for name in ["Anna", "Boris", "Clara", "Dmytro"] {
        create(ctx, &token, name, "1990-05-17").await;
    }

    let res = ctx.get("/api/contacts", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(first_names(&res.body), vec!["Anna", "Boris", "Clara", "Dmytro"]);

    let res = ctx.get("/api/contacts?skip=1&limit=2", Some(&token)).await;
    assert_eq!(first_names(&res.body), vec!["Boris", "Clara"]);

    let res = ctx.get("/api/contacts?limit=-1", Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn read_missing_contact(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;

    let res = ctx.get("/api/contacts/999", Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.detail(), "Contact not found");

    let res = ctx.get("/api/contacts/abc", Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn contacts_are_private_to_owner(ctx: &TestHarness) {
    let owner = ctx.signed_in_user("owner").await;
    let stranger = ctx.signed_in_user("stranger").await;
    let created = create(ctx, &owner, "Anna", "1990-05-17").await;
    let uri = format!("/api/contacts/{}", created["id"]);

    assert_eq!(ctx.get(&uri, Some(&stranger)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.delete(&uri, Some(&stranger)).await.status, StatusCode::NOT_FOUND);
    let res = ctx
        .json(Method::PATCH, &uri, Some(&stranger), contact_body("Mallory", "1990-01-01"))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = ctx.get("/api/contacts", Some(&stranger)).await;
    assert_eq!(res.body, json!([]));
    assert_eq!(ctx.get(&uri, Some(&owner)).await.status, StatusCode::OK);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_contact(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;
    let created = create(ctx, &token, "Anna", "1990-05-17").await;
    let uri = format!("/api/contacts/{}", created["id"]);

    let mut body = contact_body("Anna", "1991-06-18");
    body["phone"] = json!("+380671112233");
    body["description"] = Value::Null;
    let res = ctx.json(Method::PATCH, &uri, Some(&token), body).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], created["id"]);
    assert_eq!(res.body["phone"], "+380671112233");
    assert_eq!(res.body["birth_date"], "1991-06-18");
    assert!(res.body["description"].is_null());

    let res = ctx
        .json(
            Method::PATCH,
            "/api/contacts/999",
            Some(&token),
            contact_body("Anna", "1990-05-17"),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn remove_contact(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;
    let created = create(ctx, &token, "Anna", "1990-05-17").await;
    let uri = format!("/api/contacts/{}", created["id"]);

    let res = ctx.delete(&uri, Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, created);

    let res = ctx.delete(&uri, Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(ctx.deps.contacts.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_contacts(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;
    create(ctx, &token, "Anna", "1990-05-17").await;
    create(ctx, &token, "Joanna", "1990-05-17").await;
    create(ctx, &token, "Boris", "1990-05-17").await;

    let res = ctx.get("/api/contacts/search?query=ANNA", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(first_names(&res.body), vec!["Anna", "Joanna"]);

    // Matches the email column too
    let res = ctx
        .get("/api/contacts/search?query=boris%40example", Some(&token))
        .await;
    assert_eq!(first_names(&res.body), vec!["Boris"]);

    let res = ctx.get("/api/contacts/search?query=zzz", Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.detail(), "Contacts not found");

    let res = ctx.get("/api/contacts/search", Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upcoming_birthdays(ctx: &TestHarness) {
    let token = ctx.signed_in_user("owner").await;

    let res = ctx.get("/api/contacts/birthdays", Some(&token)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.detail(), "Contacts not found");

    create(ctx, &token, "Today", &birth_date_in(0)).await;
    create(ctx, &token, "Soon", &birth_date_in(3)).await;
    create(ctx, &token, "Later", &birth_date_in(30)).await;
    create(ctx, &token, "Yesterday", &birth_date_in(-1)).await;

    let res = ctx.get("/api/contacts/birthdays", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(first_names(&res.body), vec!["Today", "Soon"]);
}
