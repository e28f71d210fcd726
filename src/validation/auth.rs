use crate::error::{AppError, Result};

/// Validates an email address shape.
///
/// # Arguments
///
/// * `email` - The email to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is valid.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::Validation("Email cannot be empty".to_string()));
    }

    if email.len() > 255 {
        return Err(AppError::Validation(
            "Email must be at most 255 characters".to_string(),
        ));
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation(
            "Email must look like name@domain.tld".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a required human name field.
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }

    if value.len() > 255 {
        return Err(AppError::Validation(format!(
            "{} must be at most 255 characters",
            field
        )));
    }

    Ok(())
}

/// Validates a skill name: unique enforcement lives in the store, but the
/// name must be non-empty after trimming.
pub fn validate_skill_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Skill name cannot be empty".to_string()));
    }
    if trimmed.len() > 255 {
        return Err(AppError::Validation(
            "Skill name must be at most 255 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("ada@crafters.edu").is_ok());
        assert!(validate_email("  ada@crafters.edu  ").is_ok());
    }

    #[test]
    fn rejects_bad_email_shapes() {
        for bad in ["", "ada", "@crafters.edu", "ada@", "ada@nodot"] {
            assert!(validate_email(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn skill_names_are_trimmed_and_non_empty() {
        assert_eq!(validate_skill_name("  Rust  ").unwrap(), "Rust");
        assert!(validate_skill_name("   ").is_err());
    }
}
