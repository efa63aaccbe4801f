//! Form payloads, for use with `actix_web::web::Form`.

use crate::{
    secret::Secret,
    users::NewUser,
};

#[derive(Debug, serde::Deserialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: Secret,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: Secret,
}

#[derive(Debug, serde::Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ResetPasswordForm {
    pub password: Secret,
    pub confirm_password: Secret,
}

impl RegistrationForm {
    /// Splits the form into the account details and the chosen password.
    pub fn into_parts(self) -> (NewUser, Secret) {
        let new_user = NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: self.email,
        };
        (new_user, self.password)
    }
}

impl ResetPasswordForm {
    /// Indicates whether the password and its confirmation are the same. This
    /// doesn't need to be done in constant-time, because both are provided by
    /// the user.
    pub(crate) fn passwords_match(&self) -> bool {
        self.password.expose() == self.confirm_password.expose()
    }
}
