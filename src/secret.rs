use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secret string (a password, reset token, or hash). Use `Secret::from` to
/// convert a `String` to a `Secret`, and `secret.expose()` to access the
/// string value where necessary.
///
/// Secrets are redacted in `std::fmt::Debug` displays, and are automatically
/// zeroed-out in memory when the value is dropped.
#[derive(Clone)]
#[cfg_attr(feature = "diesel", derive(diesel_derive_newtype::DieselNewType))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct Secret(pub(crate) String);

/// A user's stored password hash, in PHC string format. Use
/// `PasswordHash::from` to convert a `String` to a `PasswordHash`, and
/// `hash.expose()` to access the string value where necessary.
#[derive(Clone)]
#[cfg_attr(feature = "diesel", derive(diesel_derive_newtype::DieselNewType))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct PasswordHash(pub(crate) Secret);

impl Secret {
    /// Make use of this secret as a `&str`. This may be needed when putting a
    /// token into a link, or storing a hashed secret in the database.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The number of characters in the secret. Password policies count
    /// characters, not bytes.
    pub(crate) fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for Secret {}

impl PasswordHash {
    /// Make use of this password hash as a `&str`. This may be needed when
    /// storing in the database.
    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl From<String> for Secret {
    fn from(string: String) -> Self {
        Self(string)
    }
}

impl From<&str> for Secret {
    fn from(string: &str) -> Self {
        Self(string.to_string())
    }
}

impl From<String> for PasswordHash {
    fn from(string: String) -> Self {
        Self(Secret(string))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[SECRET]")
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[SECRET]")
    }
}

impl<'de> serde::Deserialize<'de> for Secret {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)
            .map(Self::from)
    }
}
