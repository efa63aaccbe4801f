mod app;
mod errors;
pub mod forms;
mod hashing;
pub mod ledger;
mod mail;
mod pages;
mod reset;
mod secret;
mod sessions;
mod users;

#[cfg(test)]
mod testing;

pub use app::{
    App,
    AppConfig,
    AppDb,
    AppMailer,
    AppSessions,
    AppTypes,
};
pub use errors::{
    Error,
    Problem,
};
pub use ledger::ResetTokenData;
pub use mail::Email;
pub use pages::{
    Flash,
    Level,
    Page,
    Redirect,
};
pub use reset::{
    request_password_reset,
    submit_password_reset,
    visit_reset_link,
};
pub use secret::{
    PasswordHash,
    Secret,
};
pub use sessions::{
    login,
    logout,
};
pub use users::{
    NewUser,
    UserData,
    UserRecord,
    register_new_user,
};

/// The minimum password length, in characters, unless the application
/// configures another with `AppConfig::minimum_password_length()`.
pub const MINIMUM_PASSWORD_LENGTH: usize = 5;

/// How long a password reset link can be used for, unless the application
/// configures another lifetime with
/// `AppConfig::reset_token_expire_after_minutes()`.
pub const RESET_TOKEN_EXPIRE_AFTER_MINUTES: u64 = 10;
