use crate::{
    app::{App, AppTypes},
    errors::{Error, Problem},
    hashing,
    secret::{PasswordHash, Secret},
};

pub trait UserRecord<T> {
    /// Gets the user's id field.
    fn id(&self) -> T;

    /// Gets the user's unique username.
    fn username(&self) -> &str;

    /// Gets the user's unique email address. Password reset links are sent
    /// here.
    fn email(&self) -> &str;
}

/// A user as read from the credential store.
pub struct UserData<A: AppTypes> {
    pub user: A::User,
    pub password_hash: PasswordHash,

    /// Inactive users cannot log in.
    pub is_active: bool,
}

/// The details of an account to be registered. The password is given
/// separately, since it is never stored.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

/// Registers a new user with a password they have chosen for themselves.
///
/// The username and email address must not belong to an existing account,
/// and the password must be at least `AppConfig::minimum_password_length()`
/// characters. Every rule is checked, and all of the failures are returned
/// together in `Error::Rejected`; in that case no user is created.
///
/// Returns the registered user with their unique id.
pub async fn register_new_user<A: App>(
    app: &A,
    new_user: NewUser,
    password: Secret,
) -> Result<A::User, A::Error> {
    let mut problems = Vec::new();

    if app.get_user_data_by_username(&new_user.username)
        .await?
        .is_some()
    {
        problems.push(Problem::DuplicateUsername);
    }

    if app.get_user_data_by_email(&new_user.email)
        .await?
        .is_some()
    {
        problems.push(Problem::DuplicateEmail);
    }

    if let Err(problem) = check_password_length(app, &password) {
        problems.push(problem);
    }

    if !problems.is_empty() {
        log::info!("Registration of {:?} rejected: {problems:?}", new_user.username);
        return Error::Rejected(problems).as_app_err();
    }

    let hash = hashing::generate_password_hash(&password)?;
    let user = app.insert_user(&new_user, hash)
        .await?;

    log::info!("Registered user #{}", user.id());
    Ok(user)
}

/// Checks that the password is at least `AppConfig::minimum_password_length()`
/// characters long.
pub(crate) fn check_password_length<A: App>(app: &A, password: &Secret) -> Result<(), Problem> {
    let minimum_length = app.minimum_password_length();
    if password.char_count() < minimum_length {
        return Err(Problem::WeakPassword {minimum_length});
    }
    Ok(())
}
