//! Signup and login payload validators

use regex::Regex;
use std::sync::OnceLock;

use super::models::{LoginPayload, SignupPayload, UserType};
use crate::common::{ValidationResult, Validator};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

fn check_email(result: &mut ValidationResult, email: &str) {
    if email.trim().is_empty() {
        result.add_error("email", "Email is required");
    } else if !email_regex().is_match(email.trim()) {
        result.add_error("email", "Email address is not valid");
    }
}

pub struct SignupValidator;

impl Validator<SignupPayload> for SignupValidator {
    fn validate(&self, data: &SignupPayload) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.check_length("first_name", &data.first_name, 2, 100);
        result.check_length("last_name", &data.last_name, 2, 100);
        check_email(&mut result, &data.email);

        if data.password.chars().count() < 6 {
            result.add_error("password", "Password must be at least 6 characters");
        }

        if data.phone.trim().is_empty() {
            result.add_error("phone", "Phone is required");
        }

        if data.user_type.parse::<UserType>().is_err() {
            result.add_error("user_type", "User type must be ADMIN or USER");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginPayload> for LoginValidator {
    fn validate(&self, data: &LoginPayload) -> ValidationResult {
        let mut result = ValidationResult::new();

        check_email(&mut result, &data.email);
        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}
