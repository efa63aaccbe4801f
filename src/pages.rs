use crate::errors::Error;

/// A page the user can be redirected to after submitting a form. Rendering
/// the pages is up to the application; these are the places the flows send
/// the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Register,
    Login,
    ForgotPassword,

    /// The page where the user chooses a new password, for the given reset
    /// token.
    ResetPassword(String),
}

/// The severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A message to show the user once, on the next page they see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub text: String,
}

/// Where to send the user, and what to tell them when they get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: Page,
    pub messages: Vec<Flash>,
}

impl Page {
    /// The default path of this page.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Register => "/register/".to_string(),
            Self::Login => "/login/".to_string(),
            Self::ForgotPassword => "/forgot-password/".to_string(),
            Self::ResetPassword(token) => format!("/reset-password/{token}/"),
        }
    }
}

impl Error {
    /// The page where the user can try again after this error, given the page
    /// whose form they submitted.
    ///
    /// A bad reset link cannot be retried, so the user is sent to request a new
    /// one. An expired token is reported through `Rejected` and returns to the
    /// reset page; the next visit there yields `InvalidToken`.
    pub fn retry_page(&self, attempted: Page) -> Page {
        match self {
            Self::InvalidToken
            | Self::UserNotFound {..}
            | Self::DeliveryFailure => Page::ForgotPassword,

            Self::InvalidCredentials => Page::Login,

            Self::Rejected(_)
            | Self::Hasher(_)
            | Self::Template(_) => attempted,
        }
    }

    /// Converts this error into a redirect back into the flow, with every
    /// message for the user.
    pub fn into_redirect(self, attempted: Page) -> Redirect {
        Redirect {
            to: self.retry_page(attempted),
            messages: self.messages()
                .into_iter()
                .map(Flash::error)
                .collect(),
        }
    }
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {level: Level::Success, text: text.into()}
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {level: Level::Error, text: text.into()}
    }
}

impl Redirect {
    /// After registering, the user is asked to log in.
    pub fn registered() -> Self {
        Self {
            to: Page::Login,
            messages: vec![Flash::success("Account created. Login now")],
        }
    }

    /// After resetting their password, the user is asked to log in with it.
    pub fn password_reset() -> Self {
        Self {
            to: Page::Login,
            messages: vec![Flash::success("Password reset. Proceed to login")],
        }
    }

    /// After logging in, the user goes to the home page.
    pub fn logged_in() -> Self {
        Self {to: Page::Home, messages: Vec::new()}
    }

    /// After logging out, the user goes to the login page.
    pub fn logged_out() -> Self {
        Self {to: Page::Login, messages: Vec::new()}
    }
}
