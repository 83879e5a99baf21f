//! Credentials
//!
//! Client-side checks run before a sign-in or registration request is handed to the
//! identity provider, and the mapping of provider failures to shopper-facing errors.

use std::fmt;

use thiserror::Error;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Passwords at least this long can be rated above weak.
pub const STRONG_PASSWORD_LENGTH: usize = 8;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// How hard a password looks to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    /// Short, or only one kind of character
    Weak,
    /// Long enough, with two kinds of character
    Medium,
    /// Long enough, with letters, digits and special characters
    Strong,
}

impl PasswordStrength {
    /// Rate a password.
    ///
    /// Passwords of at least [`STRONG_PASSWORD_LENGTH`] characters are `Strong` when they mix
    /// letters, digits and special characters, and `Medium` with any two of those.
    pub fn of(password: &str) -> Self {
        if password.chars().count() < STRONG_PASSWORD_LENGTH {
            return PasswordStrength::Weak;
        }

        let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

        match [has_letter, has_digit, has_special]
            .into_iter()
            .filter(|present| *present)
            .count()
        {
            3 => PasswordStrength::Strong,
            2 => PasswordStrength::Medium,
            _ => PasswordStrength::Weak,
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PasswordStrength::Weak => "weak",
            PasswordStrength::Medium => "medium",
            PasswordStrength::Strong => "strong",
        })
    }
}

/// Reasons a registration form is rejected before submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Email, password or confirmation is empty.
    #[error("please fill in all fields")]
    MissingFields,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password is shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    PasswordTooShort,
}

/// Validate a registration form.
///
/// # Errors
///
/// Returns the first failing check, in the order: missing fields, mismatch, length.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), RegistrationError> {
    if email.is_empty() || password.is_empty() || confirmation.is_empty() {
        return Err(RegistrationError::MissingFields);
    }

    if password != confirmation {
        return Err(RegistrationError::PasswordMismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegistrationError::PasswordTooShort);
    }

    Ok(())
}

/// Reasons a sign-in form is rejected before submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    /// Email or password is empty.
    #[error("please enter both email and password")]
    MissingFields,
}

/// Validate a sign-in form.
///
/// # Errors
///
/// Returns [`LoginError::MissingFields`] unless both email and password are given.
pub fn validate_login(email: &str, password: &str) -> Result<(), LoginError> {
    if email.is_empty() || password.is_empty() {
        return Err(LoginError::MissingFields);
    }

    Ok(())
}

/// Identity provider failures, as reported to the shopper.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Registration with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailAlreadyInUse,

    /// Malformed email address.
    #[error("invalid email address")]
    InvalidEmail,

    /// The provider refused the password as too weak.
    #[error("password is too weak")]
    WeakPassword,

    /// Sign-in for an email with no account.
    #[error("no account found with this email")]
    UserNotFound,

    /// Sign-in with the wrong password.
    #[error("invalid password")]
    WrongPassword,

    /// Any other sign-in failure.
    #[error("failed to log in, please try again")]
    LoginFailed,

    /// Any other registration failure.
    #[error("failed to create account, please try again")]
    RegistrationFailed,
}

impl AuthError {
    /// Map a provider error code raised while signing in. Unrecognised codes become
    /// [`AuthError::LoginFailed`].
    pub fn from_login_code(code: &str) -> Self {
        match code {
            "auth/user-not-found" => AuthError::UserNotFound,
            "auth/wrong-password" => AuthError::WrongPassword,
            "auth/invalid-email" => AuthError::InvalidEmail,
            _ => AuthError::LoginFailed,
        }
    }

    /// Map a provider error code raised while registering. Unrecognised codes become
    /// [`AuthError::RegistrationFailed`].
    pub fn from_registration_code(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" => AuthError::EmailAlreadyInUse,
            "auth/invalid-email" => AuthError::InvalidEmail,
            "auth/weak-password" => AuthError::WeakPassword,
            _ => AuthError::RegistrationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_short_passwords_are_weak() {
        assert_eq!(PasswordStrength::of(""), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::of("a1!"), PasswordStrength::Weak);
    }

    #[test]
    fn long_single_class_passwords_are_weak() {
        assert_eq!(PasswordStrength::of("abcdefghij"), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::of("1234567890"), PasswordStrength::Weak);
    }

    #[test]
    fn long_two_class_passwords_are_medium() {
        assert_eq!(PasswordStrength::of("abcd1234"), PasswordStrength::Medium);
        assert_eq!(PasswordStrength::of("abcd!@#$"), PasswordStrength::Medium);
        assert_eq!(PasswordStrength::of("1234!@#$"), PasswordStrength::Medium);
    }

    #[test]
    fn long_three_class_passwords_are_strong() {
        assert_eq!(PasswordStrength::of("abc123!?"), PasswordStrength::Strong);
    }

    #[test]
    fn unlisted_symbols_do_not_count_as_special() {
        assert_eq!(PasswordStrength::of("abcd123~"), PasswordStrength::Medium);
    }

    #[test]
    fn strength_orders_weak_to_strong() {
        assert!(PasswordStrength::Weak < PasswordStrength::Medium);
        assert!(PasswordStrength::Medium < PasswordStrength::Strong);
        assert_eq!(PasswordStrength::Strong.to_string(), "strong");
    }

    #[test]
    fn registration_requires_every_field() {
        assert_eq!(
            validate_registration("", "secret1", "secret1"),
            Err(RegistrationError::MissingFields)
        );
        assert_eq!(
            validate_registration("a@b.c", "secret1", ""),
            Err(RegistrationError::MissingFields)
        );
    }

    #[test]
    fn registration_requires_matching_passwords() {
        assert_eq!(
            validate_registration("a@b.c", "secret1", "secret2"),
            Err(RegistrationError::PasswordMismatch)
        );
    }

    #[test]
    fn registration_requires_minimum_length() {
        assert_eq!(
            validate_registration("a@b.c", "abc", "abc"),
            Err(RegistrationError::PasswordTooShort)
        );
        assert_eq!(validate_registration("a@b.c", "abcdef", "abcdef"), Ok(()));
    }

    #[test]
    fn login_requires_email_and_password() {
        assert_eq!(validate_login("", "secret1"), Err(LoginError::MissingFields));
        assert_eq!(validate_login("a@b.c", ""), Err(LoginError::MissingFields));
        assert_eq!(validate_login("a@b.c", "x"), Ok(()));
    }

    #[test]
    fn login_codes_map_to_messages() {
        assert_eq!(
            AuthError::from_login_code("auth/user-not-found"),
            AuthError::UserNotFound
        );
        assert_eq!(
            AuthError::from_login_code("auth/wrong-password"),
            AuthError::WrongPassword
        );
        assert_eq!(
            AuthError::from_login_code("auth/invalid-email").to_string(),
            "invalid email address"
        );
        assert_eq!(
            AuthError::from_login_code("auth/network-request-failed"),
            AuthError::LoginFailed
        );
    }

    #[test]
    fn registration_codes_map_to_messages() {
        assert_eq!(
            AuthError::from_registration_code("auth/email-already-in-use"),
            AuthError::EmailAlreadyInUse
        );
        assert_eq!(
            AuthError::from_registration_code("auth/weak-password").to_string(),
            "password is too weak"
        );
        assert_eq!(
            AuthError::from_registration_code("auth/invalid-email"),
            AuthError::InvalidEmail
        );
    }

    #[test]
    fn unknown_codes_fall_back_per_flow() {
        assert_eq!(
            AuthError::from_registration_code("auth/user-not-found"),
            AuthError::RegistrationFailed
        );
        assert_eq!(
            AuthError::from_login_code("auth/email-already-in-use"),
            AuthError::LoginFailed
        );
    }
}
