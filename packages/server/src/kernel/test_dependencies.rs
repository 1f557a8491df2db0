// TestDependencies - in-memory implementations for testing
//
// Provides repositories and mock services that can be injected into
// ServerDeps so the HTTP layer runs without Postgres, SMTP or Cloudinary.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{BaseFileUploader, BaseMailer, ImageUpload, OutgoingEmail, ServerDeps};
use crate::common::{ContactId, Pagination, UserId};
use crate::domains::auth::{JwtService, PasswordHasher};
use crate::domains::contacts::{Contact, ContactInput, ContactRepository};
use crate::domains::users::{DuplicateUser, NewUser, Role, User, UserRepository};

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

// =============================================================================
// In-memory User Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    ping_fails: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored user
    pub fn get(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn set_role(&self, username: &str, role: Role) {
        if let Some(user) = self
            .users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.username == username)
        {
            user.role = role.to_string();
        }
    }

    /// Make `ping` report the store as unreachable
    pub fn set_ping_failing(&self, failing: bool) {
        self.ping_fails.store(failing, Ordering::SeqCst);
    }

    pub fn set_confirmed(&self, username: &str, confirmed: bool) {
        if let Some(user) = self
            .users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.username == username)
        {
            user.is_confirmed = confirmed;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.email == new_user.email || u.username == new_user.username)
        {
            return Err(DuplicateUser.into());
        }

        let user = User {
            id: UserId::from_i64(users.len() as i64 + 1),
            email: new_user.email,
            username: new_user.username,
            hashed_password: new_user.hashed_password,
            is_confirmed: false,
            avatar: None,
            refresh_token_hash: None,
            role: Role::User.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.get(username))
    }

    async fn confirm_email(&self, email: &str) -> Result<()> {
        if let Some(user) = self
            .users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.email == email)
        {
            user.is_confirmed = true;
        }
        Ok(())
    }

    async fn update_avatar_url(&self, email: &str, url: &str) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.email == email).map(|user| {
            user.avatar = Some(url.to_string());
            user.clone()
        }))
    }

    async fn update_refresh_token(&self, id: UserId, token_hash: Option<String>) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.refresh_token_hash = token_hash;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        if self.ping_fails.load(Ordering::SeqCst) {
            return Err(anyhow!("database unreachable"));
        }
        Ok(())
    }
}

// =============================================================================
// In-memory Contact Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryContactRepository {
    contacts: Mutex<Vec<Contact>>,
    next_id: Mutex<i64>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn owned(&self, owner: UserId) -> Vec<Contact> {
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect()
    }
}

fn apply(contact: &mut Contact, input: ContactInput) {
    contact.first_name = input.first_name;
    contact.last_name = input.last_name;
    contact.email = input.email;
    contact.phone = input.phone;
    contact.birth_date = input.birth_date;
    contact.description = input.description;
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn list(&self, owner: UserId, page: Pagination) -> Result<Vec<Contact>> {
        Ok(self
            .owned(owner)
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.effective_limit() as usize)
            .collect())
    }

    async fn list_all(&self, owner: UserId) -> Result<Vec<Contact>> {
        Ok(self.owned(owner))
    }

    async fn find_by_id(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>> {
        Ok(self.owned(owner).into_iter().find(|c| c.id == id))
    }

    async fn search(&self, owner: UserId, query: &str) -> Result<Vec<Contact>> {
        Ok(self
            .owned(owner)
            .into_iter()
            .filter(|c| c.matches(query))
            .collect())
    }

    async fn create(&self, owner: UserId, input: ContactInput) -> Result<Contact> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let contact = Contact {
            id: ContactId::from_i64(id),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            birth_date: input.birth_date,
            description: input.description,
            user_id: owner,
        };
        self.contacts.lock().unwrap().push(contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        owner: UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Option<Contact>> {
        let mut contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|contact| {
                apply(contact, input);
                contact.clone()
            }))
    }

    async fn remove(&self, owner: UserId, id: ContactId) -> Result<Option<Contact>> {
        let mut contacts = self.contacts.lock().unwrap();
        let position = contacts.iter().position(|c| c.id == id && c.user_id == owner);
        Ok(position.map(|i| contacts.remove(i)))
    }
}

// =============================================================================
// Mock Mailer
// =============================================================================

#[derive(Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose every send fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Pull the token out of the confirmation link in a sent email
    pub fn confirmation_token(email: &OutgoingEmail) -> Option<String> {
        let marker = "/confirm_email/";
        let start = email.html.find(marker)? + marker.len();
        let rest = &email.html[start..];
        let end = rest.find('"').unwrap_or(rest.len());
        Some(rest[..end].to_string())
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        if self.fail {
            return Err(anyhow!("mock mailer failure"));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

// =============================================================================
// Mock File Uploader
// =============================================================================

/// Arguments captured from an upload call
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub file_name: String,
    pub size: usize,
    pub upload: ImageUpload,
}

#[derive(Default)]
pub struct MockFileUploader {
    calls: Arc<Mutex<Vec<UploadCall>>>,
    fail: bool,
}

impl MockFileUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }

    /// URL the mock returns for a public id
    pub fn url_for(public_id: &str) -> String {
        format!(
            "https://res.cloudinary.com/test/image/upload/c_fill,h_250,w_250/v1/{}",
            public_id
        )
    }
}

#[async_trait]
impl BaseFileUploader for MockFileUploader {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        upload: &ImageUpload,
    ) -> Result<String> {
        if self.fail {
            return Err(anyhow!("mock uploader failure"));
        }
        self.calls.lock().unwrap().push(UploadCall {
            file_name: file_name.to_string(),
            size: bytes.len(),
            upload: upload.clone(),
        });
        Ok(Self::url_for(&upload.public_id))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Handles to every in-memory dependency so tests can inspect them
pub struct TestDependencies {
    pub users: Arc<InMemoryUserRepository>,
    pub contacts: Arc<InMemoryContactRepository>,
    pub mailer: Arc<MockMailer>,
    pub uploader: Arc<MockFileUploader>,
    pub jwt_service: Arc<JwtService>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            contacts: Arc::new(InMemoryContactRepository::new()),
            mailer: Arc::new(MockMailer::new()),
            uploader: Arc::new(MockFileUploader::new()),
            jwt_service: Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
        }
    }

    pub fn mock_mailer(mut self, mailer: MockMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    pub fn mock_uploader(mut self, uploader: MockFileUploader) -> Self {
        self.uploader = Arc::new(uploader);
        self
    }

    /// User store whose health check always fails
    pub fn with_failing_ping(self) -> Self {
        self.users.set_ping_failing(true);
        self
    }

    /// ServerDeps backed by these mocks (bcrypt cost kept minimal)
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.users.clone(),
            self.contacts.clone(),
            self.mailer.clone(),
            self.uploader.clone(),
            self.jwt_service.clone(),
            PasswordHasher::new(4),
        )
    }
}
