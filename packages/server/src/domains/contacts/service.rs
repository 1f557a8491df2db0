use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::info;

use crate::common::{ContactId, Pagination, UserId};
use crate::domains::contacts::data::ContactInput;
use crate::domains::contacts::errors::ContactError;
use crate::domains::contacts::models::Contact;
use crate::domains::contacts::repository::ContactRepository;

/// Days ahead (inclusive) that count as "next week" for birthdays
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

/// Contact operations for the authenticated owner
#[derive(Clone)]
pub struct ContactsService {
    repository: Arc<dyn ContactRepository>,
}

impl ContactsService {
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_contact(
        &self,
        owner: UserId,
        input: ContactInput,
    ) -> Result<Contact, ContactError> {
        input.validate()?;
        let contact = self.repository.create(owner, input).await?;
        info!(user_id = %owner, contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    pub async fn get_contacts(
        &self,
        owner: UserId,
        page: Pagination,
    ) -> Result<Vec<Contact>, ContactError> {
        Ok(self.repository.list(owner, page).await?)
    }

    pub async fn get_contact(&self, owner: UserId, id: ContactId) -> Result<Contact, ContactError> {
        self.repository
            .find_by_id(owner, id)
            .await?
            .ok_or(ContactError::ContactNotFound)
    }

    /// Contacts whose first name, last name or email contains `query`
    pub async fn search_contacts(
        &self,
        owner: UserId,
        query: &str,
    ) -> Result<Vec<Contact>, ContactError> {
        let contacts = self.repository.search(owner, query.trim()).await?;
        non_empty(contacts)
    }

    /// Contacts whose next birthday falls between `today` and a week later
    pub async fn get_birthdays_next_week(
        &self,
        owner: UserId,
        today: NaiveDate,
    ) -> Result<Vec<Contact>, ContactError> {
        let horizon = today + Duration::days(BIRTHDAY_WINDOW_DAYS);
        let contacts = self.repository.list_all(owner).await?;
        non_empty(
            contacts
                .into_iter()
                .filter(|c| next_birthday(c.birth_date, today) <= horizon)
                .collect(),
        )
    }

    pub async fn update_contact(
        &self,
        owner: UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Contact, ContactError> {
        input.validate()?;
        self.repository
            .update(owner, id, input)
            .await?
            .ok_or(ContactError::ContactNotFound)
    }

    pub async fn remove_contact(&self, owner: UserId, id: ContactId) -> Result<Contact, ContactError> {
        let contact = self
            .repository
            .remove(owner, id)
            .await?
            .ok_or(ContactError::ContactNotFound)?;
        info!(user_id = %owner, contact_id = %contact.id, "Contact removed");
        Ok(contact)
    }
}

fn non_empty(contacts: Vec<Contact>) -> Result<Vec<Contact>, ContactError> {
    if contacts.is_empty() {
        Err(ContactError::ContactsNotFound)
    } else {
        Ok(contacts)
    }
}

/// First anniversary of `birth_date` on or after `today`.
///
/// 29 February birthdays fall on 28 February in non-leap years.
pub fn next_birthday(birth_date: NaiveDate, today: NaiveDate) -> NaiveDate {
    let this_year = anniversary(birth_date, today.year());
    if this_year >= today {
        this_year
    } else {
        anniversary(birth_date, today.year() + 1)
    }
}

fn anniversary(birth_date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birth_date.month(), birth_date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birth_date.month(), birth_date.day() - 1))
        .unwrap_or(birth_date)
}
