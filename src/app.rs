use actix_web::HttpRequest;

use crate::{
    errors::Error,
    ledger::ResetTokenData,
    mail::Email,
    pages::Page,
    secret::{PasswordHash, Secret},
    users::{NewUser, UserData, UserRecord},
    MINIMUM_PASSWORD_LENGTH,
    RESET_TOKEN_EXPIRE_AFTER_MINUTES,
};

pub trait App: AppConfig + AppDb + AppMailer + AppSessions + AppTypes + Clone + 'static {
    /// Returns the current time.
    fn time_now(&self) -> Self::DateTime;
}

pub trait AppTypes: Sized {
    /// The type of a numeric ID in the database; usually `i64`, `i32`, etc.
    type ID: Eq + Copy + std::fmt::Display;

    /// The type used to represent a date and time in the application.
    type DateTime: Copy
        + Ord
        + core::ops::Add<std::time::Duration, Output = Self::DateTime>
        + core::ops::Sub<std::time::Duration, Output = Self::DateTime>;

    /// The type of a user in the application.
    type User: UserRecord<Self::ID> + Clone;

    /// A type representing an application error. This must support conversion
    /// from `authflow::Error`.
    type Error: From<Error> + actix_web::ResponseError;
}

/// This trait defines functions which provide configuration parameters to the
/// authentication library.
#[allow(unused)]
pub trait AppConfig {
    /// Returns the minimum password length, in characters.
    ///
    /// Default is 5.
    fn minimum_password_length(&self) -> usize {
        MINIMUM_PASSWORD_LENGTH
    }

    /// Returns the number of minutes for which a password reset link can be
    /// used after it is issued.
    ///
    /// Default is 10 minutes.
    fn reset_token_expire_after_minutes(&self) -> u64 {
        RESET_TOKEN_EXPIRE_AFTER_MINUTES
    }

    /// Returns the subject line of the password reset email.
    ///
    /// Default is `"Reset Your Password"`.
    fn reset_email_subject(&self) -> &str {
        "Reset Your Password"
    }

    /// Returns the path of the page where a user completes a password reset.
    /// The scheme and host of the incoming request are prepended to this to
    /// make the link sent by email, so the path must match a route which
    /// invokes `visit_reset_link` and `submit_password_reset`.
    ///
    /// Default is `"/reset-password/{token}/"`.
    fn reset_password_path(&self, token: &str) -> String {
        Page::ResetPassword(token.to_string()).path()
    }
}

/// This trait defines functions which will be used by the authentication
/// library to store and retrieve data about users and password reset tokens.
#[trait_variant::make(Send)]
pub trait AppDb: AppTypes {
    /// Gets a user's data, including their password hash and active state, by
    /// their username.
    ///
    /// Returns `None` if there is no user with that username.
    async fn get_user_data_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserData<Self>>, Self::Error>;

    /// Gets a user's data, including their password hash and active state, by
    /// their email address.
    ///
    /// Returns `None` if there is no user with that email address.
    async fn get_user_data_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserData<Self>>, Self::Error>;

    /// Inserts a new active user, returning the user with their new unique
    /// id.
    async fn insert_user(
        &self,
        new_user: &NewUser,
        password_hash: PasswordHash,
    ) -> Result<Self::User, Self::Error>;

    /// Updates a user's stored password hash.
    async fn update_password(
        &self,
        user: &Self::User,
        password_hash: PasswordHash,
    ) -> Result<(), Self::Error>;

    /// Inserts a new password reset token for the user. Only the hash of the
    /// token is stored; it is the unique key of the token.
    async fn insert_reset_token(
        &self,
        user: &Self::User,
        token_hash: Secret,
        created_at: Self::DateTime,
    ) -> Result<(), Self::Error>;

    /// Gets the data for a password reset token, including the user and the
    /// time it was created.
    ///
    /// Returns `None` if there is no token with that hash.
    async fn get_reset_token(
        &self,
        token_hash: &Secret,
    ) -> Result<Option<ResetTokenData<Self>>, Self::Error>;

    /// Deletes a password reset token and returns its data, in a single atomic
    /// operation. If two requests race to take the same token, at most one of
    /// them may receive it.
    ///
    /// Returns `None` if there is no token with that hash. It is not an error
    /// to attempt to take a non-existent token.
    async fn take_reset_token(
        &self,
        token_hash: &Secret,
    ) -> Result<Option<ResetTokenData<Self>>, Self::Error>;

    /// Deletes every password reset token created before the given time,
    /// returning the number of tokens deleted.
    async fn delete_reset_tokens_created_before(
        &self,
        cutoff: Self::DateTime,
    ) -> Result<u64, Self::Error>;
}

/// This trait defines functions which will be used by the authentication
/// library to send emails to users.
#[trait_variant::make(Send)]
pub trait AppMailer: AppTypes {
    /// Sends an HTML email. An error means the email was not sent.
    async fn send_email(&self, email: Email) -> Result<(), Self::Error>;
}

/// This trait defines functions which will be used by the authentication
/// library to start and end sessions. How sessions are stored, and how the
/// client is told about them, is up to the application.
///
/// Unlike the other traits, the futures returned here need not be `Send`,
/// since they borrow the request.
#[allow(async_fn_in_trait)]
pub trait AppSessions: AppTypes {
    /// Begins a new session for the user, who has just logged in.
    async fn begin_session(
        &self,
        user: &Self::User,
        request: &HttpRequest,
    ) -> Result<(), Self::Error>;

    /// Ends the session belonging to the request, if there is one. It is not
    /// an error to end a session when the user is not logged in.
    async fn end_session(&self, request: &HttpRequest) -> Result<(), Self::Error>;
}
