//! 表单的简单校验
//!
//! 只做长度与格式检查，服务端校验才是权威。

use crate::protocol::{CreateStoreRequest, CreateUserRequest, SignupRequest, UpdatePasswordRequest};
use thiserror::Error;

pub const NAME_MIN: usize = 20;
pub const NAME_MAX: usize = 60;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;
pub const ADDRESS_MAX: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Name must be between 20 and 60 characters")]
    NameLength,
    #[error("Please enter a valid email address")]
    Email,
    #[error("Password must be between 8 and 16 characters")]
    PasswordLength,
    #[error("Password must include at least one uppercase letter")]
    PasswordUppercase,
    #[error("Password must include at least one special character")]
    PasswordSpecial,
    #[error("Address must be at most 400 characters")]
    AddressLength,
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(ValidationError::Required("Name"));
    }
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::Email);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return Err(ValidationError::Email);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len == 0 {
        return Err(ValidationError::Required("Password"));
    }
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ValidationError::PasswordLength);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(ValidationError::PasswordUppercase);
    }
    if !password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        return Err(ValidationError::PasswordSpecial);
    }
    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::Required("Address"));
    }
    if address.chars().count() > ADDRESS_MAX {
        return Err(ValidationError::AddressLength);
    }
    Ok(())
}

/// 收集所有失败项，保持字段顺序
fn collect(checks: impl IntoIterator<Item = Result<(), ValidationError>>) -> Vec<ValidationError> {
    checks.into_iter().filter_map(Result::err).collect()
}

pub fn validate_signup(req: &SignupRequest) -> Vec<ValidationError> {
    collect([
        validate_name(&req.name),
        validate_email(&req.email),
        validate_password(&req.password),
        validate_address(&req.address),
    ])
}

pub fn validate_new_user(req: &CreateUserRequest) -> Vec<ValidationError> {
    collect([
        validate_name(&req.name),
        validate_email(&req.email),
        validate_password(&req.password),
        validate_address(&req.address),
    ])
}

pub fn validate_new_store(req: &CreateStoreRequest) -> Vec<ValidationError> {
    let store_name = if req.name.trim().is_empty() {
        Err(ValidationError::Required("Store name"))
    } else {
        Ok(())
    };
    collect([
        store_name,
        validate_email(&req.email),
        validate_address(&req.address),
        validate_email(&req.owner_email),
    ])
}

pub fn validate_password_change(req: &UpdatePasswordRequest) -> Vec<ValidationError> {
    let current = if req.current_password.is_empty() {
        Err(ValidationError::Required("Current password"))
    } else {
        Ok(())
    };
    collect([current, validate_password(&req.new_password)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert_eq!(validate_name(""), Err(ValidationError::Required("Name")));
        assert_eq!(validate_name("Short Name"), Err(ValidationError::NameLength));
        assert!(validate_name("Alexandra Montgomery-Smith").is_ok());
        assert_eq!(
            validate_name(&"x".repeat(61)),
            Err(ValidationError::NameLength)
        );
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(
            validate_password("Ab!"),
            Err(ValidationError::PasswordLength)
        );
        assert_eq!(
            validate_password("abcdefg!"),
            Err(ValidationError::PasswordUppercase)
        );
        assert_eq!(
            validate_password("Abcdefgh"),
            Err(ValidationError::PasswordSpecial)
        );
        assert!(validate_password("Abcdefg!").is_ok());
        assert_eq!(
            validate_password("Abcdefghijklmno!x"),
            Err(ValidationError::PasswordLength)
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("nora@example.com").is_ok());
        assert_eq!(validate_email("nora"), Err(ValidationError::Email));
        assert_eq!(validate_email("@example.com"), Err(ValidationError::Email));
        assert_eq!(validate_email("nora@example"), Err(ValidationError::Email));
        assert_eq!(validate_email("no ra@example.com"), Err(ValidationError::Email));
    }

    #[test]
    fn test_signup_collects_every_failure() {
        let req = SignupRequest {
            name: "Tiny".into(),
            email: "bad".into(),
            password: "Abcdefg!".into(),
            address: "x".repeat(401),
        };
        assert_eq!(
            validate_signup(&req),
            vec![
                ValidationError::NameLength,
                ValidationError::Email,
                ValidationError::AddressLength,
            ]
        );
        assert_eq!(
            ValidationError::NameLength.to_string(),
            "Name must be between 20 and 60 characters"
        );
    }
}
