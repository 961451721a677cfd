use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{LoginRequest, UserIn};
use crate::error::{AuthError, FieldError};

pub const PHONE_NUMBER_LEN: usize = 10;
pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
        return false;
    }
    true
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if require(errors, "email", email) && !is_valid_email(email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }
}

fn check_password(errors: &mut Vec<FieldError>, password: &str) {
    if require(errors, "password", password) && password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
}

/// Normalizes the email in place and checks every field, collecting all failures.
pub fn validate_registration(input: &mut UserIn) -> Result<(), AuthError> {
    input.email = normalize_email(&input.email);
    input.first_name = input.first_name.trim().to_string();
    input.last_name = input.last_name.trim().to_string();
    input.phone_number = input.phone_number.trim().to_string();

    let mut errors = Vec::new();
    require(&mut errors, "first_name", &input.first_name);
    require(&mut errors, "last_name", &input.last_name);
    check_email(&mut errors, &input.email);
    if require(&mut errors, "phone_number", &input.phone_number)
        && input.phone_number.chars().count() != PHONE_NUMBER_LEN
    {
        errors.push(FieldError::new(
            "phone_number",
            format!("must be exactly {} characters", PHONE_NUMBER_LEN),
        ));
    }
    check_password(&mut errors, &input.password);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

/// Length policy is not re-checked here: a short password simply fails verification.
pub fn validate_login(input: &mut LoginRequest) -> Result<(), AuthError> {
    input.email = normalize_email(&input.email);

    let mut errors = Vec::new();
    check_email(&mut errors, &input.email);
    require(&mut errors, "password", &input.password);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> UserIn {
        UserIn {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "  A@B.com ".into(),
            phone_number: "1234567890".into(),
            password: "secret1".into(),
        }
    }

    fn fields(err: AuthError) -> Vec<&'static str> {
        match err {
            AuthError::Validation(errs) => errs.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("@b.com"));
    }

    #[test]
    fn registration_normalizes_email() {
        let mut input = valid_user();
        validate_registration(&mut input).expect("valid");
        assert_eq!(input.email, "a@b.com");
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let mut input = UserIn {
            phone_number: "12345".into(),
            password: "short".into(),
            email: "nope".into(),
            ..Default::default()
        };
        let got = fields(validate_registration(&mut input).unwrap_err());
        assert_eq!(
            got,
            vec!["first_name", "last_name", "email", "phone_number", "password"]
        );
    }

    #[test]
    fn phone_number_must_be_exact_length() {
        let mut input = valid_user();
        input.phone_number = "12345678901".into();
        assert_eq!(
            fields(validate_registration(&mut input).unwrap_err()),
            vec!["phone_number"]
        );
    }

    #[test]
    fn login_accepts_short_password() {
        let mut input = LoginRequest {
            email: "a@b.com".into(),
            password: "wrong".into(),
        };
        assert!(validate_login(&mut input).is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let mut input = LoginRequest::default();
        assert_eq!(
            fields(validate_login(&mut input).unwrap_err()),
            vec!["email", "password"]
        );
    }
}
