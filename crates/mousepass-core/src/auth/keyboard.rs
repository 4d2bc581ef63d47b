//! Keyboard fallback secret
//!
//! The typed secret is a convenience fallback next to the gesture. In its
//! plaintext form it is NOT a secure credential: the value sits in the config
//! file and is compared as-is. An Argon2id hash can be configured instead.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::config::LockConfig;
use crate::error::{Error, Result};

/// Configured keyboard secret
pub enum KeyboardSecret {
    /// Typing never unlocks
    Disabled,
    /// Plain text comparison (insecure)
    Plaintext(Zeroizing<String>),
    /// Argon2 PHC hash string
    Argon2(String),
}

impl std::fmt::Debug for KeyboardSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyboardSecret::Disabled => write!(f, "Disabled"),
            KeyboardSecret::Plaintext(_) => write!(f, "Plaintext(..)"),
            KeyboardSecret::Argon2(_) => write!(f, "Argon2(..)"),
        }
    }
}

impl KeyboardSecret {
    /// Pick the secret from configuration, hash first
    pub fn from_config(config: &LockConfig) -> Result<Self> {
        if let Some(hash) = &config.keyboard_secret_hash {
            PasswordHash::new(hash).map_err(|e| Error::SecretHash(e.to_string()))?;
            return Ok(KeyboardSecret::Argon2(hash.clone()));
        }

        Ok(match &config.keyboard_secret {
            Some(secret) => KeyboardSecret::Plaintext(Zeroizing::new(secret.clone())),
            None => KeyboardSecret::Disabled,
        })
    }

    /// Hash a secret into a PHC string suitable for `keyboard_secret_hash`
    pub fn hash(secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let secret_bytes = Zeroizing::new(secret.as_bytes().to_vec());

        Argon2::default()
            .hash_password(&secret_bytes, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::SecretHash(e.to_string()))
    }

    /// Check typed input against the secret
    pub fn verify(&self, input: &str) -> bool {
        match self {
            KeyboardSecret::Disabled => false,
            KeyboardSecret::Plaintext(secret) => secret.as_str() == input,
            KeyboardSecret::Argon2(hash) => match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(input.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, KeyboardSecret::Disabled)
    }

    pub fn is_plaintext(&self) -> bool {
        matches!(self, KeyboardSecret::Plaintext(_))
    }
}

/// Bounded buffer of typed characters, wiped on drop
#[derive(Debug)]
pub(crate) struct KeyboardBuffer {
    text: Zeroizing<String>,
    max_chars: usize,
}

impl KeyboardBuffer {
    pub(crate) fn new(max_chars: usize) -> Self {
        Self {
            text: Zeroizing::new(String::new()),
            max_chars,
        }
    }

    /// Append a character unless the buffer is full
    pub(crate) fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.len() >= self.max_chars {
            return false;
        }
        self.text.push(c);
        true
    }

    pub(crate) fn pop(&mut self) -> bool {
        self.text.pop().is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }
}
