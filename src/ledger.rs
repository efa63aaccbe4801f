//! The ledger of outstanding password reset tokens.
//!
//! A token's raw value only ever appears in the link emailed to the user; the
//! ledger is keyed by its hash. Expired tokens are not swept in the
//! background. They are deleted when someone tries to use them, or by an
//! explicit call to `purge_expired`.

use std::time::Duration;

use crate::{
    app::{App, AppTypes},
    hashing,
    secret::Secret,
    users::UserRecord,
};

/// A stored password reset token.
pub struct ResetTokenData<A: AppTypes> {
    /// The user whose password may be reset with this token.
    pub user: A::User,

    /// The time the token was issued. This never changes.
    pub created_at: A::DateTime,
}

/// A newly issued password reset token, which has been stored in the ledger.
pub struct IssuedResetToken<A: AppTypes> {
    /// The raw token, to be embedded in the user's reset link.
    pub token: Secret,
    pub created_at: A::DateTime,
}

/// Generates a fresh token for the user and stores it with the current time.
pub async fn create<A: App>(app: &A, user: &A::User) -> Result<IssuedResetToken<A>, A::Error> {
    let (token, token_hash) = hashing::generate_reset_token_and_hash();
    let created_at = app.time_now();

    app.insert_reset_token(user, token_hash, created_at)
        .await?;

    log::debug!("Issued password reset token for user #{}", user.id());
    Ok(IssuedResetToken {token, created_at})
}

/// Finds the token in the ledger, whether or not it has expired.
///
/// Returns `None` if there is no such token.
pub async fn lookup<A: App>(app: &A, token: &Secret) -> Result<Option<ResetTokenData<A>>, A::Error> {
    app.get_reset_token(&hashing::fast_hash(token))
        .await
}

/// Indicates whether the token can still be used, i.e. no more than
/// `AppConfig::reset_token_expire_after_minutes()` have passed since it was
/// created.
pub fn is_valid<A: App>(app: &A, data: &ResetTokenData<A>) -> bool {
    app.time_now() <= data.created_at + lifetime(app)
}

/// Deletes the token from the ledger, returning its data if it was there.
/// At most one caller can consume a given token; any other gets `None`.
pub async fn consume<A: App>(app: &A, token: &Secret) -> Result<Option<ResetTokenData<A>>, A::Error> {
    let data = app.take_reset_token(&hashing::fast_hash(token))
        .await?;

    if let Some(data) = &data {
        log::debug!("Consumed password reset token for user #{}", data.user.id());
    }
    Ok(data)
}

/// Deletes every expired token from the ledger, returning how many were
/// deleted. Expiry is always checked when a token is used, so calling this is
/// optional; it only stops the ledger from growing.
pub async fn purge_expired<A: App>(app: &A) -> Result<u64, A::Error> {
    let cutoff = app.time_now() - lifetime(app);
    let count = app.delete_reset_tokens_created_before(cutoff)
        .await?;

    if count > 0 {
        log::info!("Purged {count} expired password reset tokens");
    }
    Ok(count)
}

fn lifetime<A: App>(app: &A) -> Duration {
    Duration::from_secs(60 * app.reset_token_expire_after_minutes())
}
