//! Salted password hashing compatible with existing lockit user tables.
//!
//! Keys are PBKDF2-HMAC-SHA1 over the hex encoded salt string, 10 iterations,
//! 20 byte output, stored as lowercase hex. These parameters match the
//! records written by the other lockit database adapters, so accounts created
//! there can still log in.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use subtle::ConstantTimeEq;

use super::errors::UserError;
use crate::utils::hex_encode;

const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => panic!("PBKDF2 iteration count must be non-zero"),
};
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 20;

/// Output of [`hash_password`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub salt: String,
    pub derived_key: String,
}

/// Hash `password` with a freshly generated random salt.
pub fn hash_password(password: &str) -> Result<PasswordHash, UserError> {
    let rng = SystemRandom::new();
    let mut salt_bytes = [0u8; SALT_LEN];
    rng.fill(&mut salt_bytes)
        .map_err(|_| UserError::Hashing("Failed to generate salt".to_string()))?;

    let salt = hex_encode(&salt_bytes);
    let derived_key = derive_key(password, &salt);

    Ok(PasswordHash { salt, derived_key })
}

/// Check `password` against a stored salt and derived key.
pub fn verify_password(password: &str, salt: &str, derived_key: &str) -> bool {
    let candidate = derive_key(password, salt);
    candidate.as_bytes().ct_eq(derived_key.as_bytes()).into()
}

fn derive_key(password: &str, salt: &str) -> String {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA1,
        PBKDF2_ITERATIONS,
        salt.as_bytes(),
        password.as_bytes(),
        &mut key,
    );
    hex_encode(&key)
}
