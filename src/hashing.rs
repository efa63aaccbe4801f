use argon2::Argon2;
use password_hash::{
    PasswordHasher,
    PasswordVerifier,
    SaltString,
};

use crate::{
    errors::Error,
    secret::{PasswordHash, Secret},
};

/// The number of bytes of entropy in a new password reset token. OWASP
/// recommends at least 8 bytes of entropy for tokens of this kind.
/// https://cheatsheetseries.owasp.org/cheatsheets/Forgot_Password_Cheat_Sheet.html#url-tokens
///
/// We round up to the next multiple of three, since the token is encoded in
/// base64, so each three unencoded bytes become four encoded bytes. If the
/// number of bytes is not a multiple of 3, the encoded token will end with
/// filler characters which add no entropy.
pub const RESET_TOKEN_BYTES: usize = 18;

/// Checks a password against a stored password hash, returning `Ok` if the
/// password is correct and `Err(Error::InvalidCredentials)` otherwise.
///
/// Also returns an error if the stored hash is invalid.
pub(crate) fn verify_password(stored_hash: &PasswordHash, given_password: &Secret) -> Result<(), Error> {
    let hash = password_hash::PasswordHash::new(stored_hash.expose())
        .map_err(Error::Hasher)?;

    let algs: &[&dyn PasswordVerifier] = &[&Argon2::default()];
    hash.verify_password(algs, given_password.expose())
        .map_err(|e| match e {
            password_hash::Error::Password => Error::InvalidCredentials,
            e => Error::Hasher(e),
        })
}

/// Computes a password hash for the given password, which can be stored in the
/// database. A strong password hashing algorithm with a salt is used.
///
/// This function cannot be used to compare a password against a stored hash;
/// instead, use the `verify_password` function.
pub(crate) fn generate_password_hash(new_password: &Secret) -> Result<PasswordHash, Error> {
    let salt = SaltString::generate(rand::thread_rng());

    let hash = Argon2::default()
        .hash_password(new_password.expose().as_bytes(), &salt)
        .map_err(Error::Hasher)?;

    Ok(PasswordHash::from(hash.to_string()))
}

/// Generates a new random password reset token, and its hash. The hash should
/// be stored in the database, and the raw token should only be sent to the
/// user in their reset link.
///
/// Returns `(token, hash)`.
pub(crate) fn generate_reset_token_and_hash() -> (Secret, Secret) {
    let raw = generate_base64_token::<RESET_TOKEN_BYTES>();
    let hash = fast_hash(&raw);

    (raw, hash)
}

/// Computes a fast hash of a reset token. The hash is cryptographically
/// secure, but not suitable for passwords.
///
/// Reset tokens are generated randomly with high entropy, not chosen by the
/// user, and they expire within minutes. A slow hash or salt would add nothing,
/// and without a salt the hash can be used directly as the lookup key.
pub(crate) fn fast_hash(s: &Secret) -> Secret {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(s.expose());
    let hash = &hasher.finalize();
    Secret(base64_encode(hash))
}

/// Generates a random token with `N` bytes of entropy, base64-encoded. The
/// encoded token is URL-safe.
fn generate_base64_token<const N: usize>() -> Secret {
    use rand::{thread_rng, Rng};

    let mut bytes = [0u8; N];
    thread_rng().fill(&mut bytes as &mut [u8]);
    Secret(base64_encode(&bytes))
}

fn base64_encode(bytes: &[u8]) -> String {
    // Reset tokens will be used in URL paths
    use base64::{engine::general_purpose::URL_SAFE, Engine};
    URL_SAFE.encode(bytes)
}
