//! Password strength policy and credential types.
//!
//! | type | purpose |
//! |---|---|
//! | [`PlainPassword`] | plaintext as typed by a person or generated for one |
//! | [`PasswordHash`] | opaque output of a [`CredentialHasher`], the only form ever stored |

use rand::Rng;
use serde::{Deserialize, Serialize};

use gatehouse_core::DomainResult;

pub const STRONG_THRESHOLD: u32 = 20;
pub const VERY_STRONG_THRESHOLD: u32 = 40;

const DIGITS: &[u8] = b"0123456789";
const UPPER_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const SYMBOLS: &[u8] = b"\"`!?$%^&*()_-+={[}]:;@'~#|\\<,>./";

/// Plaintext password.
///
/// `Debug` output is masked so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn strength(&self) -> u32 {
        strength(&self.0)
    }

    pub fn is_weak(&self) -> bool {
        is_weak(&self.0)
    }
}

/// Stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// One-way, deterministic credential protection.
///
/// The same plaintext always yields the same hash, so credentials can be
/// compared (and looked up) by re-hashing. Nothing ever decrypts.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &PlainPassword) -> DomainResult<PasswordHash>;
}

/// Score a password.
///
/// Length beyond seven characters, letter case variety and symbols add up;
/// mixing at least two letters with at least two digits adds a bonus.
pub fn strength(password: &str) -> u32 {
    let mut strength = 0;

    let length = password.chars().count() as u32;
    if length > 7 {
        strength += 10 + (length - 7);
    }

    let (mut digits, mut letters, mut lower, mut upper, mut symbols) = (0, 0, 0, 0, 0);
    for ch in password.chars() {
        if ch.is_alphabetic() {
            letters += 1;
            if ch.is_uppercase() {
                upper += 1;
            } else {
                lower += 1;
            }
        } else if ch.is_numeric() {
            digits += 1;
        } else {
            symbols += 1;
        }
    }

    strength += upper + lower + symbols;
    if letters >= 2 && digits >= 2 {
        strength += letters + digits;
    }
    strength
}

pub fn is_weak(password: &str) -> bool {
    strength(password) < STRONG_THRESHOLD
}

pub fn is_strong(password: &str) -> bool {
    strength(password) >= STRONG_THRESHOLD
}

pub fn is_very_strong(password: &str) -> bool {
    strength(password) >= VERY_STRONG_THRESHOLD
}

/// Random password that passes [`is_strong`].
pub fn generate_strong_password() -> PlainPassword {
    let mut rng = rand::rng();
    let mut password = String::new();

    loop {
        let class = match rng.random_range(0..4) {
            0 => UPPER_LETTERS,
            1 => LOWER_LETTERS,
            2 => DIGITS,
            _ => SYMBOLS,
        };
        password.push(char::from(class[rng.random_range(0..class.len())]));

        if password.len() >= 7 && is_strong(&password) {
            return PlainPassword(password);
        }
    }
}
