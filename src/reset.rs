//! The password reset flow.
//!
//! A reset goes through these steps, each driven by one request:
//!
//! 1. The user gives their email address; a token is issued and a link to it
//!    is emailed to them (`request_password_reset`).
//! 2. The user follows the link, and is shown a form to choose a new password
//!    (`visit_reset_link`).
//! 3. The user submits the form; the new password is either committed or the
//!    submission is rejected (`submit_password_reset`).
//!
//! The token's expiry is only checked in step 3, so an expired link still
//! shows the form; submitting it then deletes the token.

use actix_web::HttpRequest;

use crate::{
    app::App,
    errors::{Error, Problem},
    forms::ResetPasswordForm,
    hashing,
    ledger,
    mail,
    secret::Secret,
    users::{check_password_length, UserRecord},
};

/// Issues a password reset token to the user with the given email address,
/// and emails them a link to reset their password. The link is built from the
/// scheme and host of `request`.
///
/// Returns `Error::UserNotFound` if no user has that email address; no token
/// is issued. Returns `Error::DeliveryFailure` if the email cannot be sent;
/// the token is deleted, since nobody can ever use it.
pub async fn request_password_reset<A: App>(
    app: &A,
    email: &str,
    request: &HttpRequest,
) -> Result<(), A::Error> {
    let Some(user_data) = app
        .get_user_data_by_email(email)
        .await?
    else {
        log::info!("Password reset requested for unknown email address");
        return Error::UserNotFound {email: email.to_string()}.as_app_err();
    };
    let user = user_data.user;

    let issued = ledger::create(app, &user)
        .await?;
    let link = mail::reset_link(app, &issued.token, request);
    let message = match mail::reset_email(app, &user, &link) {
        Ok(message) => message,
        Err(e) => {
            log::error!("Failed to render password reset email for user #{}: {e:?}", user.id());
            ledger::consume(app, &issued.token)
                .await?;

            return e.as_app_err();
        },
    };

    if let Err(e) = app.send_email(message)
        .await
    {
        log::warn!("Failed to send password reset email to user #{}: {e}", user.id());
        ledger::consume(app, &issued.token)
            .await?;

        return Error::DeliveryFailure.as_app_err();
    }

    log::info!("Sent password reset link to user #{}", user.id());
    Ok(())
}

/// Checks that the reset link refers to an existing token, and returns the
/// user it belongs to so the new password form can be shown.
///
/// Expiry is not checked here. Nothing is written.
pub async fn visit_reset_link<A: App>(app: &A, token: &Secret) -> Result<A::User, A::Error> {
    let Some(data) = ledger::lookup(app, token)
        .await?
    else {
        log::debug!("Reset link visited with unknown token");
        return Error::InvalidToken.as_app_err();
    };

    Ok(data.user)
}

/// Sets a new password for the user the reset token belongs to, and deletes
/// the token. Returns the user, who should then be asked to log in with their
/// new password.
///
/// Returns `Error::InvalidToken` if the token does not exist, including when
/// a concurrent submission with the same token has already used it.
/// Otherwise every rule is checked, and all of the failures are returned
/// together in `Error::Rejected`:
///
/// - the password and confirmation must match;
/// - the password must be at least `AppConfig::minimum_password_length()`
///   characters;
/// - the token must not have expired. An expired token is deleted.
pub async fn submit_password_reset<A: App>(
    app: &A,
    token: &Secret,
    form: ResetPasswordForm,
) -> Result<A::User, A::Error> {
    let Some(data) = ledger::lookup(app, token)
        .await?
    else {
        log::debug!("Password reset submitted with unknown token");
        return Error::InvalidToken.as_app_err();
    };

    let mut problems = Vec::new();

    if !form.passwords_match() {
        problems.push(Problem::PasswordMismatch);
    }

    if let Err(problem) = check_password_length(app, &form.password) {
        problems.push(problem);
    }

    if !ledger::is_valid(app, &data) {
        log::debug!("Reset token for user #{} has expired; deleting", data.user.id());
        problems.push(Problem::ExpiredToken);

        ledger::consume(app, token)
            .await?;
    }

    if !problems.is_empty() {
        log::info!("Password reset for user #{} rejected: {problems:?}", data.user.id());
        return Error::Rejected(problems).as_app_err();
    }

    // Hash before taking the token, so that a hashing failure leaves the token
    // usable.
    let new_hash = hashing::generate_password_hash(&form.password)?;

    // Only the request which takes the token may change the password.
    let Some(data) = ledger::consume(app, token)
        .await?
    else {
        log::info!("Reset token for user #{} was used concurrently", data.user.id());
        return Error::InvalidToken.as_app_err();
    };

    app.update_password(&data.user, new_hash)
        .await?;

    log::info!("Successful password reset for user #{}", data.user.id());
    Ok(data.user)
}
