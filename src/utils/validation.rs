use std::borrow::Cow;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

pub fn is_valid_email(value: &str) -> bool {
    value.validate_email()
}

pub fn add_error(errors: &mut ValidationErrors, field: &'static str, code: &'static str, message: &str) {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.to_string()));
    errors.add(field, error);
}

pub fn single_error(field: &'static str, code: &'static str, message: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    add_error(&mut errors, field, code, message);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ann@x.com"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("ann@"));
    }

    #[test]
    fn single_error_carries_field_and_message() {
        let errors = single_error("email", "unique", "This email is already registered.");
        assert!(errors.field_errors().contains_key("email"));
    }
}
