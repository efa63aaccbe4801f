use actix_web::HttpRequest;
use askama::Template;

use crate::{
    app::App,
    errors::Error,
    secret::Secret,
    users::UserRecord,
};

/// An HTML email to be sent by `AppMailer::send_email`.
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Builds the absolute link to the password reset page for the token. The
/// scheme and host are those of the incoming request, so the link points back
/// at the site the user requested the reset from.
pub(crate) fn reset_link<A: App>(app: &A, token: &Secret, request: &HttpRequest) -> Secret {
    let info = request.connection_info();
    let path = app.reset_password_path(token.expose());

    Secret(format!("{}://{}{path}", info.scheme(), info.host()))
}

/// The body of the password reset email. Fields are HTML-escaped when
/// rendered.
#[derive(Template)]
#[template(path = "password_reset_email.html")]
struct PasswordResetEmail<'a> {
    username: &'a str,
    reset_url: &'a str,
}

/// Builds the password reset email for the user, containing the reset link.
pub(crate) fn reset_email<A: App>(app: &A, user: &A::User, link: &Secret) -> Result<Email, Error> {
    let html_body = PasswordResetEmail {
        username: user.username(),
        reset_url: link.expose(),
    }
        .render()
        .map_err(Error::Template)?;

    Ok(Email {
        to: user.email().to_string(),
        subject: app.reset_email_subject().to_string(),
        html_body,
    })
}
