use actix_web::http::StatusCode;

/// A single failed validation rule. Validation rules are checked
/// independently, so a rejected form can fail several rules at once; they are
/// reported together in `Error::Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// The chosen username belongs to an existing account.
    DuplicateUsername,

    /// The chosen email address belongs to an existing account.
    DuplicateEmail,

    /// The chosen password is shorter than
    /// `AppConfig::minimum_password_length()`.
    WeakPassword {minimum_length: usize},

    /// The new password and its confirmation are not the same.
    PasswordMismatch,

    /// The reset link is older than the token lifetime. The token has been
    /// deleted, so the user must request a new link.
    ExpiredToken,
}

#[derive(Debug)]
pub enum Error {
    /// Indicates that one or more validation rules failed. Nothing was
    /// written, except that an expired reset token is always deleted.
    Rejected(Vec<Problem>),

    /// Indicates that the user did not provide a correct username and
    /// password when attempting to log in, or that the account is inactive.
    /// These cases are not distinguished, to avoid leaking information about
    /// which accounts exist.
    InvalidCredentials,

    /// Indicates that a password reset was requested for an email address
    /// which does not belong to any account.
    UserNotFound {email: String},

    /// Indicates that the reset token in a link does not exist. It might
    /// already have been used, or deleted because it expired, or it never
    /// existed.
    InvalidToken,

    /// Indicates that the reset email could not be sent. The token issued for
    /// it has been deleted.
    DeliveryFailure,

    /// Internal error which occurs when hashing or verifying a password. This
    /// could indicate, for example, that a hash stored in the database is in
    /// the wrong format, or uses an unsupported algorithm.
    Hasher(password_hash::Error),

    /// Internal error which occurs when the reset email template fails to
    /// render.
    Template(askama::Error),
}

impl Problem {
    /// The message to show the user when this rule fails.
    pub fn message(&self) -> String {
        match self {
            Self::DuplicateUsername => "Username already exists".to_string(),
            Self::DuplicateEmail => "Email already exists".to_string(),
            Self::WeakPassword {minimum_length} => {
                format!("Password must be at least {minimum_length} characters long")
            },
            Self::PasswordMismatch => "Passwords do not match".to_string(),
            Self::ExpiredToken => "Reset link has expired".to_string(),
        }
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected(_) => StatusCode::BAD_REQUEST,

            Self::InvalidCredentials
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,

            Self::UserNotFound {..} => StatusCode::NOT_FOUND,

            Self::DeliveryFailure => StatusCode::BAD_GATEWAY,

            Self::Hasher(_)
            | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Every message to show the user for this error, in the order the rules
    /// were checked.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Rejected(problems) => problems
                .iter()
                .map(Problem::message)
                .collect(),
            Self::InvalidCredentials => vec!["Invalid login credentials".to_string()],
            Self::UserNotFound {email} => vec![format!("No user with email '{email}' found")],
            Self::InvalidToken => vec!["Invalid reset id".to_string()],
            Self::DeliveryFailure => vec!["The reset email could not be sent".to_string()],
            Self::Hasher(_)
            | Self::Template(_) => vec!["Something went wrong".to_string()],
        }
    }

    /// Indicates whether the given rule is among the failures reported by
    /// this error.
    pub fn has_problem(&self, problem: Problem) -> bool {
        matches!(self, Self::Rejected(problems) if problems.contains(&problem))
    }

    pub(crate) fn as_app_err<T, E: From<Self>>(self) -> Result<T, E> {
        Err(E::from(self))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        Error::status_code(self)
    }
}
