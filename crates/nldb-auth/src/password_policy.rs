//! The password policy `register` and `changePassword` enforce: at least 8
//! characters, with at least one uppercase letter, one lowercase letter, one
//! digit, and one special (non-alphanumeric) character.

const MIN_LENGTH: usize = 8;

/// Check `password` against the policy.
///
/// # Errors
///
/// Returns a description of the first unmet requirement.
pub fn validate(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_LENGTH {
        return Err(format!("must be at least {MIN_LENGTH} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("must contain a digit".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err("must contain a special character".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_policy_compliant_password() {
        assert!(validate("Aa1!aaaa").is_ok());
    }

    #[test]
    fn rejects_password_one_char_short() {
        assert!(validate("Aa1!aaa").is_err());
    }

    #[test]
    fn rejects_password_missing_special_char() {
        assert!(validate("Aa1aaaaa").is_err());
    }

    #[test]
    fn rejects_all_lowercase_password() {
        assert!(validate("aaaaaaaa").is_err());
    }
}
