use super::errors::PasswordPolicyError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Maximum password length in bytes.
///
/// bcrypt only reads the first 72 bytes of its input. Longer passwords are
/// rejected at this boundary rather than silently truncated, so hashing
/// and verification always see the same bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate password strength before hashing.
///
/// Requirements: at least 8 characters, at most 72 bytes, at least one
/// uppercase letter, one lowercase letter, and one digit.
///
/// # Errors
/// The first failing rule, as a `PasswordPolicyError`.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_CHARS,
        });
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_BYTES,
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    Ok(())
}
