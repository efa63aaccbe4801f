//! An in-memory application for unit tests, with a clock which only moves when
//! told to.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, SystemTime},
};

use actix_web::HttpRequest;

use crate::{
    app::{App, AppConfig, AppDb, AppMailer, AppSessions, AppTypes},
    errors::Error,
    hashing,
    ledger::ResetTokenData,
    mail::Email,
    secret::{PasswordHash, Secret},
    users::{NewUser, UserData, UserRecord},
};

#[derive(Debug, Clone)]
pub(crate) struct TestUser {
    id: i64,
    username: String,
    email: String,
}

#[derive(Clone)]
pub(crate) struct TestApp {
    state: Arc<Mutex<State>>,
}

struct State {
    now: SystemTime,
    next_id: i64,
    users: Vec<StoredUser>,
    reset_tokens: HashMap<String, StoredToken>,
    sent_emails: Vec<Email>,
    sessions: Vec<i64>,
    fail_mail: bool,
    take_token_after_next_lookup: bool,
}

struct StoredUser {
    user: TestUser,
    password_hash: PasswordHash,
    is_active: bool,
}

struct StoredToken {
    user: TestUser,
    created_at: SystemTime,
}

impl UserRecord<i64> for TestUser {
    fn id(&self) -> i64 {
        self.id
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn email(&self) -> &str {
        &self.email
    }
}

impl StoredUser {
    fn to_data(&self) -> UserData<TestApp> {
        UserData {
            user: self.user.clone(),
            password_hash: self.password_hash.clone(),
            is_active: self.is_active,
        }
    }
}

impl StoredToken {
    fn to_data(&self) -> ResetTokenData<TestApp> {
        ResetTokenData {
            user: self.user.clone(),
            created_at: self.created_at,
        }
    }
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let state = State {
            now: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            next_id: 1,
            users: Vec::new(),
            reset_tokens: HashMap::new(),
            sent_emails: Vec::new(),
            sessions: Vec::new(),
            fail_mail: false,
            take_token_after_next_lookup: false,
        };
        Self {state: Arc::new(Mutex::new(state))}
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Adds an active user directly, bypassing registration.
    pub(crate) fn add_user(&self, username: &str, email: &str, password: &str) -> TestUser {
        let password_hash = hashing::generate_password_hash(&Secret::from(password)).unwrap();
        self.state().insert(username, email, password_hash)
    }

    pub(crate) fn deactivate(&self, user_id: i64) {
        let mut state = self.state();
        let user = state.users
            .iter_mut()
            .find(|u| u.user.id == user_id)
            .unwrap();
        user.is_active = false;
    }

    pub(crate) fn advance(&self, duration: Duration) {
        self.state().now += duration;
    }

    /// Makes the mailer fail, or succeed again.
    pub(crate) fn fail_mail(&self, fail: bool) {
        self.state().fail_mail = fail;
    }

    /// Simulates a competing request which takes a reset token immediately
    /// after the next lookup of it.
    pub(crate) fn take_token_after_next_lookup(&self) {
        self.state().take_token_after_next_lookup = true;
    }

    pub(crate) fn user_count(&self) -> usize {
        self.state().users.len()
    }

    pub(crate) fn password_hash_of(&self, username: &str) -> PasswordHash {
        self.state().users
            .iter()
            .find(|u| u.user.username == username)
            .map(|u| u.password_hash.clone())
            .unwrap()
    }

    pub(crate) fn reset_token_count(&self) -> usize {
        self.state().reset_tokens.len()
    }

    pub(crate) fn stored_token_hashes(&self) -> Vec<String> {
        self.state().reset_tokens
            .keys()
            .cloned()
            .collect()
    }

    pub(crate) fn sent_emails(&self) -> Vec<Email> {
        self.state().sent_emails.clone()
    }

    pub(crate) fn session_user_ids(&self) -> Vec<i64> {
        self.state().sessions.clone()
    }

    /// Extracts the token from the reset link in the most recent email.
    pub(crate) fn last_reset_token(&self) -> Option<Secret> {
        const PREFIX: &str = "/reset-password/";

        let state = self.state();
        let body = &state.sent_emails.last()?.html_body;
        let start = body.find(PREFIX)? + PREFIX.len();
        let end = start + body[start..].find('/')?;
        Some(Secret::from(&body[start..end]))
    }
}

impl State {
    fn insert(&mut self, username: &str, email: &str, password_hash: PasswordHash) -> TestUser {
        let user = TestUser {
            id: self.next_id,
            username: username.to_string(),
            email: email.to_string(),
        };
        self.next_id += 1;
        self.users.push(StoredUser {
            user: user.clone(),
            password_hash,
            is_active: true,
        });
        user
    }
}

impl AppTypes for TestApp {
    type ID = i64;
    type DateTime = SystemTime;
    type User = TestUser;
    type Error = Error;
}

impl AppConfig for TestApp {}

impl App for TestApp {
    fn time_now(&self) -> SystemTime {
        self.state().now
    }
}

impl AppDb for TestApp {
    async fn get_user_data_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserData<Self>>, Error> {
        Ok(self.state().users
            .iter()
            .find(|u| u.user.username == username)
            .map(StoredUser::to_data))
    }

    async fn get_user_data_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserData<Self>>, Error> {
        Ok(self.state().users
            .iter()
            .find(|u| u.user.email == email)
            .map(StoredUser::to_data))
    }

    async fn insert_user(
        &self,
        new_user: &NewUser,
        password_hash: PasswordHash,
    ) -> Result<TestUser, Error> {
        Ok(self.state().insert(&new_user.username, &new_user.email, password_hash))
    }

    async fn update_password(
        &self,
        user: &TestUser,
        password_hash: PasswordHash,
    ) -> Result<(), Error> {
        let mut state = self.state();
        if let Some(stored) = state.users.iter_mut().find(|u| u.user.id == user.id) {
            stored.password_hash = password_hash;
        }
        Ok(())
    }

    async fn insert_reset_token(
        &self,
        user: &TestUser,
        token_hash: Secret,
        created_at: SystemTime,
    ) -> Result<(), Error> {
        let token = StoredToken {user: user.clone(), created_at};
        self.state().reset_tokens
            .insert(token_hash.expose().to_string(), token);
        Ok(())
    }

    async fn get_reset_token(
        &self,
        token_hash: &Secret,
    ) -> Result<Option<ResetTokenData<Self>>, Error> {
        let mut state = self.state();
        let data = state.reset_tokens
            .get(token_hash.expose())
            .map(StoredToken::to_data);

        if data.is_some() && state.take_token_after_next_lookup {
            state.take_token_after_next_lookup = false;
            state.reset_tokens.remove(token_hash.expose());
        }
        Ok(data)
    }

    async fn take_reset_token(
        &self,
        token_hash: &Secret,
    ) -> Result<Option<ResetTokenData<Self>>, Error> {
        Ok(self.state().reset_tokens
            .remove(token_hash.expose())
            .map(|token| token.to_data()))
    }

    async fn delete_reset_tokens_created_before(
        &self,
        cutoff: SystemTime,
    ) -> Result<u64, Error> {
        let mut state = self.state();
        let before = state.reset_tokens.len();
        state.reset_tokens.retain(|_, token| token.created_at >= cutoff);
        Ok((before - state.reset_tokens.len()) as u64)
    }
}

impl AppMailer for TestApp {
    async fn send_email(&self, email: Email) -> Result<(), Error> {
        let mut state = self.state();
        if state.fail_mail {
            return Err(Error::DeliveryFailure);
        }
        state.sent_emails.push(email);
        Ok(())
    }
}

impl AppSessions for TestApp {
    async fn begin_session(&self, user: &TestUser, _request: &HttpRequest) -> Result<(), Error> {
        self.state().sessions.push(user.id);
        Ok(())
    }

    async fn end_session(&self, _request: &HttpRequest) -> Result<(), Error> {
        self.state().sessions.clear();
        Ok(())
    }
}
