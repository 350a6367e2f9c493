//! Field validation for administrator input.

use thiserror::Error;

use crate::db::RecordStatus;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 12;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 20;

/// Minimum nickname length.
pub const MIN_NICKNAME_LENGTH: usize = 2;

/// Maximum nickname length.
pub const MAX_NICKNAME_LENGTH: usize = 20;

/// Validation errors. Messages are shown to the client verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username is required")]
    UsernameRequired,

    /// Username length out of range.
    #[error("username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters")]
    UsernameLength,

    /// Username contains invalid characters.
    #[error("username can only contain letters, digits and underscores")]
    UsernameInvalidChars,

    /// Password is empty.
    #[error("password is required")]
    PasswordRequired,

    /// Password length out of range.
    #[error("password must be {MIN_PASSWORD_LENGTH}-{MAX_PASSWORD_LENGTH} characters")]
    PasswordLength,

    /// Old password is empty.
    #[error("old password required")]
    OldPasswordRequired,

    /// New password is empty.
    #[error("new password required")]
    NewPasswordRequired,

    /// New password equals the old one.
    #[error("new password must differ from the old one")]
    PasswordUnchanged,

    /// Nickname length out of range.
    #[error("nickname must be {MIN_NICKNAME_LENGTH}-{MAX_NICKNAME_LENGTH} characters")]
    NicknameLength,

    /// Nickname contains control characters.
    #[error("nickname contains invalid characters")]
    NicknameInvalidChars,

    /// Role id is not positive.
    #[error("role is required")]
    RoleRequired,

    /// Status is neither 0 nor 1.
    #[error("status must be 0 or 1")]
    InvalidStatus,

    /// Record id is not positive.
    #[error("invalid id")]
    InvalidId,

    /// A time bound could not be parsed.
    #[error("invalid time format")]
    InvalidTime,
}

/// Validate a login username (required only; length rules apply at creation).
pub fn validate_login_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    Ok(())
}

/// Validate a login password (required only).
pub fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(())
}

/// Validate a new administrator's username.
///
/// # Examples
///
/// ```
/// use backoffice::auth::validation::validate_username;
///
/// assert!(validate_username("admin1").is_ok());
/// assert!(validate_username("abc").is_err());
/// assert!(validate_username("bad name").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::UsernameLength);
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate a password being set.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::PasswordLength);
    }
    Ok(())
}

/// Validate a password change, in order: old present, new present, new
/// length, new differs from old.
pub fn validate_password_change(old: &str, new: &str) -> Result<(), ValidationError> {
    if old.is_empty() {
        return Err(ValidationError::OldPasswordRequired);
    }
    if new.is_empty() {
        return Err(ValidationError::NewPasswordRequired);
    }
    validate_password(new)?;
    if old == new {
        return Err(ValidationError::PasswordUnchanged);
    }
    Ok(())
}

/// Validate a nickname.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let len = nickname.chars().count();
    if !(MIN_NICKNAME_LENGTH..=MAX_NICKNAME_LENGTH).contains(&len) {
        return Err(ValidationError::NicknameLength);
    }
    if nickname.chars().any(|c| c.is_control()) {
        return Err(ValidationError::NicknameInvalidChars);
    }
    Ok(())
}

/// Validate a role id.
pub fn validate_role_id(role_id: i64) -> Result<(), ValidationError> {
    if role_id <= 0 {
        return Err(ValidationError::RoleRequired);
    }
    Ok(())
}

/// Validate a status code (0 disabled, 1 enabled).
pub fn validate_status(status: i32) -> Result<RecordStatus, ValidationError> {
    RecordStatus::from_code(status).ok_or(ValidationError::InvalidStatus)
}

/// Validate a record id.
pub fn validate_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidId);
    }
    Ok(())
}
