/// Longest accepted username, in characters
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Validate username format and requirements
///
/// Letters, digits, underscore and hyphen; must start with a letter or digit.
pub fn validate_username_format(username: &str) -> Result<(), String> {
    let Some(first) = username.chars().next() else {
        return Err("username is required".to_string());
    };

    if username.chars().count() < 3 {
        return Err("username must be at least 3 characters".to_string());
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(format!("username must be at most {} characters", MAX_USERNAME_LENGTH));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err("username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    if !first.is_alphanumeric() {
        return Err("username must start with a letter or number".to_string());
    }

    Ok(())
}
