use actix_web::HttpRequest;

use crate::{
    app::App,
    errors::Error,
    hashing,
    secret::Secret,
    users::UserRecord,
};

/// Logs a user in with their username and password, and begins a session for
/// them with `AppSessions::begin_session`.
///
/// An unknown username, a wrong password and an inactive account are all
/// reported as `Error::InvalidCredentials`.
pub async fn login<A: App>(
    app: &A,
    username: &str,
    password: Secret,
    request: &HttpRequest,
) -> Result<A::User, A::Error> {
    let Some(user_data) = app
        .get_user_data_by_username(username)
        .await?
    else {
        log::debug!("Login attempt for unknown username");
        return Error::InvalidCredentials.as_app_err();
    };

    // Check password first, so that inactive accounts are only revealed to
    // someone who knows the password.
    hashing::verify_password(&user_data.password_hash, &password)?;

    let user_id = user_data.user.id();
    if !user_data.is_active {
        log::info!("User #{user_id} is inactive");
        return Error::InvalidCredentials.as_app_err();
    }

    app.begin_session(&user_data.user, request)
        .await?;

    log::debug!("Successful password login for user #{user_id}");
    Ok(user_data.user)
}

/// Ends the current session, if there is one.
pub async fn logout<A: App>(app: &A, request: &HttpRequest) -> Result<(), A::Error> {
    log::debug!("Logging out");

    app.end_session(request)
        .await
}
