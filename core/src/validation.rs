//! Form validation, run before any network call.

use std::sync::LazyLock;

use regex::Regex;

use clubboard_types::{LabelDomain, ProfileUpdate};

use crate::auth::Credentials;
use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_USERNAME_LEN: usize = 32;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Missing { field: "Email" });
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

/// Passwords are taken as typed; only the length is checked.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Missing { field: "Password" });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::Missing { field: "Username" });
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong { max: MAX_USERNAME_LEN });
    }
    Ok(username.to_string())
}

/// Accept a storage code or its display label and return the code.
///
/// ```
/// use clubboard_core::validation::validate_code;
/// use clubboard_types::LabelDomain;
///
/// assert_eq!(validate_code(LabelDomain::Club, "ColorStack").unwrap(), "colorstack");
/// assert_eq!(validate_code(LabelDomain::Year, "senior").unwrap(), "senior");
/// assert!(validate_code(LabelDomain::Year, "Super Senior").is_err());
/// ```
pub fn validate_code(domain: LabelDomain, input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Missing { field: domain.title() });
    }
    let code = domain.storage_code(input);
    if domain.is_code(&code) {
        Ok(code.into_owned())
    } else {
        Err(ValidationError::UnknownCode {
            field: domain.title(),
            value: input.to_string(),
        })
    }
}

/// Check every field of a profile edit. Returns the normalized update.
pub fn validate_profile(update: &ProfileUpdate) -> Result<ProfileUpdate, ValidationError> {
    Ok(ProfileUpdate {
        username: validate_username(&update.username)?,
        year: validate_code(LabelDomain::Year, &update.year)?,
        major: validate_code(LabelDomain::Major, &update.major)?,
        main_club: validate_code(LabelDomain::Club, &update.main_club)?,
    })
}

/// Form field an error belongs next to.
pub fn error_field(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::InvalidEmail => "Email",
        ValidationError::PasswordTooShort { .. } => "Password",
        ValidationError::UsernameTooLong { .. } => "Username",
        ValidationError::Missing { field } | ValidationError::UnknownCode { field, .. } => field,
    }
}

/// Raw sign-up form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub year: String,
    pub major: String,
    pub main_club: String,
}

impl SignUpForm {
    /// Checks fields top to bottom as they appear on the form, stopping at
    /// the first problem.
    pub fn validate(&self) -> Result<(Credentials, ProfileUpdate), ValidationError> {
        let username = validate_username(&self.username)?;
        validate_password(&self.password)?;
        let email = validate_email(&self.email)?;
        let details = ProfileUpdate {
            username,
            year: validate_code(LabelDomain::Year, &self.year)?,
            major: validate_code(LabelDomain::Major, &self.major)?,
            main_club: validate_code(LabelDomain::Club, &self.main_club)?,
        };
        let credentials = Credentials {
            email,
            password: self.password.clone(),
        };
        Ok((credentials, details))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        let email = validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Missing { field: "Password" });
        }
        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            username: " ada ".into(),
            password: "secret1".into(),
            email: "ada@example.com".into(),
            year: "junior".into(),
            major: "Computer Science".into(),
            main_club: "black-engineers-society".into(),
        }
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.co", "first.last@dept.uni.edu", " padded@x.io "] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
        for bad in ["plain", "a@b", "@b.co", "a b@c.io", "a@@b.co"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
        assert_eq!(validate_email("  "), Err(ValidationError::Missing { field: "Email" }));
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_password_length() {
        assert_eq!(
            validate_password("12345"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_username_bounds() {
        assert_eq!(validate_username("  ada  ").unwrap(), "ada");
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN)).is_ok());
        assert_eq!(
            validate_username(&"x".repeat(MAX_USERNAME_LEN + 1)),
            Err(ValidationError::UsernameTooLong { max: MAX_USERNAME_LEN })
        );
    }

    #[test]
    fn test_sign_up_form_normalizes() {
        let (credentials, details) = form().validate().unwrap();
        assert_eq!(credentials.email, "ada@example.com");
        assert_eq!(details.username, "ada");
        assert_eq!(details.major, "computer-science");
        assert_eq!(details.main_club, "black-engineers-society");
    }

    #[test]
    fn test_sign_up_form_reports_first_problem() {
        let mut bad = form();
        bad.password = "123".into();
        bad.email = "nope".into();
        let err = bad.validate().unwrap_err();
        assert_eq!(error_field(&err), "Password");

        let mut bad = form();
        bad.main_club = "Chess Club".into();
        let err = bad.validate().unwrap_err();
        assert_eq!(error_field(&err), "Main Club");
        assert_eq!(err.to_string(), "\"Chess Club\" is not a valid Main Club");
    }

    #[test]
    fn test_profile_requires_every_code() {
        let update = ProfileUpdate {
            username: "ada".into(),
            year: "senior".into(),
            major: String::new(),
            main_club: "codeblack".into(),
        };
        assert_eq!(
            validate_profile(&update),
            Err(ValidationError::Missing { field: "Major" })
        );
    }

    #[test]
    fn test_sign_in_form() {
        let form = SignInForm {
            email: "ada@example.com".into(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError::Missing { field: "Password" }));
    }
}
