//! Profile forms and the checks run on them before anything is submitted

use thiserror::Error;

use crate::email::Email;
use crate::secret::SecretString;

pub const MIN_FULL_NAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Local validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Full name must be at least 3 characters")]
    NameTooShort,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("New password and confirm password do not match")]
    PasswordMismatch,
}

fn check_full_name(full_name: &str) -> Result<(), FormError> {
    if full_name.trim().chars().count() < MIN_FULL_NAME_LEN {
        return Err(FormError::NameTooShort);
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), FormError> {
    Email::new(email).map(|_| ()).map_err(|_| FormError::InvalidEmail)
}

fn check_password(password: &SecretString) -> Result<(), FormError> {
    if password.char_len() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    Ok(())
}

/// New account registration
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: SecretString,
}

impl SignupForm {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        check_full_name(&self.full_name)?;
        check_email(&self.email)?;
        check_password(&self.password)
    }
}

/// Edit of the signed-in user's own name and email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
}

impl ProfileUpdate {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        check_full_name(&self.full_name)?;
        check_email(&self.email)
    }
}

#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

impl PasswordChange {
    pub fn new(
        current_password: impl Into<SecretString>,
        new_password: impl Into<SecretString>,
        confirm_password: impl Into<SecretString>,
    ) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        check_password(&self.current_password)?;
        check_password(&self.new_password)?;
        if self.new_password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }

    /// Strength of the proposed new password
    pub fn strength(&self) -> PasswordStrength {
        evaluate(self.new_password.expose_secret())
    }
}

/// Coarse strength label shown next to a password field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Medium => "Medium",
            PasswordStrength::Strong => "Strong",
        }
    }
}

pub fn evaluate(password: &str) -> PasswordStrength {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return PasswordStrength::Weak;
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_upper && has_digit && has_symbol {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Medium
    }
}

/// Hints for the rules a password does not meet yet
pub fn suggestions(password: &str) -> Vec<&'static str> {
    let mut hints = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        hints.push("Use at least 6 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        hints.push("Add an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        hints.push("Add a number");
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        hints.push("Add a special character");
    }
    hints
}
