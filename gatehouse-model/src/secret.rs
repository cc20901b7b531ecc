use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string secret that zeroes its memory on drop
///
/// Holds passwords and bearer tokens. `Debug` and `Display` never print the
/// contents.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    data: String,
}

impl SecretString {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Borrow the secret value
    ///
    /// The returned slice points at memory that is zeroed when `self` drops.
    pub fn expose_secret(&self) -> &str {
        &self.data
    }

    /// Length in characters, for validation rules
    pub fn char_len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl From<String> for SecretString {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for SecretString {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretString")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED: {} bytes]", self.data.len())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.data.as_bytes(), other.data.as_bytes())
    }
}

impl Eq for SecretString {}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Opaque bearer token proving an authenticated identity to the server
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialToken(SecretString);

impl CredentialToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token))
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }
}

impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialToken([REDACTED])")
    }
}
