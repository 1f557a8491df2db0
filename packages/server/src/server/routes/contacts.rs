use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::common::{ContactId, Pagination};
use crate::domains::contacts::{Contact, ContactInput, ContactResponse};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

fn responses(contacts: Vec<Contact>) -> Json<Vec<ContactResponse>> {
    Json(contacts.into_iter().map(ContactResponse::from).collect())
}

/// GET /contacts?skip&limit
pub async fn read_contacts(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let contacts = state.contacts.get_contacts(user.id, page).await?;
    Ok(responses(contacts))
}

/// GET /contacts/search?query=
pub async fn search_contacts(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(search): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let contacts = state.contacts.search_contacts(user.id, &search.query).await?;
    Ok(responses(contacts))
}

/// GET /contacts/birthdays
pub async fn upcoming_birthdays(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let today = Utc::now().date_naive();
    let contacts = state
        .contacts
        .get_birthdays_next_week(user.id, today)
        .await?;
    Ok(responses(contacts))
}

/// GET /contacts/{id}
pub async fn read_contact(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<ContactId>,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = state.contacts.get_contact(user.id, id).await?;
    Ok(Json(contact.into()))
}

/// POST /contacts
pub async fn create_contact(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let contact = state.contacts.create_contact(user.id, body).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

/// PATCH /contacts/{id}
pub async fn update_contact(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<ContactId>,
    ApiJson(body): ApiJson<ContactInput>,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = state.contacts.update_contact(user.id, id, body).await?;
    Ok(Json(contact.into()))
}

/// DELETE /contacts/{id}
pub async fn remove_contact(
    Extension(state): Extension<AxumAppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<ContactId>,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = state.contacts.remove_contact(user.id, id).await?;
    Ok(Json(contact.into()))
}
