use garde::Validate;
use serde::Deserialize;
use std::fmt;

use zeroize::{Zeroize, Zeroizing};

use super::errors::{FieldErrors, required};

/// Characters allowed in a username besides ASCII letters and digits.
const USERNAME_EXTRA_CHARS: [char; 2] = ['_', '-'];

/// Restricts usernames to ASCII letters, digits, underscores and hyphens.
fn username_chars(value: &str, _ctx: &()) -> garde::Result {
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || USERNAME_EXTRA_CHARS.contains(&c))
    {
        return Err(garde::Error::new(
            "Username can only contain letters, numbers, underscores, and hyphens.",
        ));
    }
    Ok(())
}

/// The registration form as submitted.
///
/// Handlers wipe the password with `zeroize` once the form is validated.
#[derive(Deserialize, Validate, Default, Clone, Zeroize)]
#[serde(default)]
pub struct RegisterForm {
    #[zeroize(skip)]
    #[garde(length(chars, min = 3, max = 20), custom(username_chars))]
    pub username: String,
    #[garde(length(chars, min = 8, max = 128))]
    pub password: String,
    #[zeroize(skip)]
    #[garde(custom(required), email, length(chars, max = 50))]
    pub email: String,
    #[zeroize(skip)]
    #[garde(custom(required), length(chars, max = 30))]
    pub first_name: String,
    #[zeroize(skip)]
    #[garde(custom(required), length(chars, max = 30))]
    pub last_name: String,
}

/// A registration that passed validation.
pub struct Registration {
    pub username: String,
    pub password: Zeroizing<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Validates a registration form.
///
/// Email and names are trimmed first; username and password are checked
/// as typed.
pub fn validate_registration(form: &RegisterForm) -> Result<Registration, FieldErrors> {
    let normalized = RegisterForm {
        username: form.username.clone(),
        password: form.password.clone(),
        email: form.email.trim().to_string(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
    };

    normalized.validate().map_err(FieldErrors::from)?;

    Ok(Registration {
        username: normalized.username.clone(),
        password: Zeroizing::new(normalized.password.clone()),
        email: normalized.email.clone(),
        first_name: normalized.first_name.clone(),
        last_name: normalized.last_name.clone(),
    })
}

/// The login form as submitted.
#[derive(Deserialize, Validate, Default, Clone, Zeroize)]
#[serde(default)]
pub struct LoginForm {
    #[zeroize(skip)]
    #[garde(custom(required))]
    pub username: String,
    #[garde(custom(required))]
    pub password: String,
}

/// Login credentials that passed validation.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Validates a login form. Only presence is checked here; the credential
/// check decides the rest.
pub fn validate_login(form: &LoginForm) -> Result<Credentials, FieldErrors> {
    form.validate().map_err(FieldErrors::from)?;

    Ok(Credentials {
        username: form.username.clone(),
        password: Zeroizing::new(form.password.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            username: "alice".to_string(),
            password: "longpassword".to_string(),
            email: "a@x.com".to_string(),
            first_name: "A".to_string(),
            last_name: "L".to_string(),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        let registration = validate_registration(&valid_form()).unwrap();
        assert_eq!(registration.username, "alice");
        assert_eq!(registration.password.as_str(), "longpassword");
        assert_eq!(registration.email, "a@x.com");
    }

    #[test]
    fn trims_email_and_names() {
        let mut form = valid_form();
        form.email = "  a@x.com ".to_string();
        form.first_name = " Ann ".to_string();
        let registration = validate_registration(&form).unwrap();
        assert_eq!(registration.email, "a@x.com");
        assert_eq!(registration.first_name, "Ann");
    }

    #[test]
    fn username_length_bounds() {
        let mut form = valid_form();
        form.username = "ab".to_string();
        assert!(!validate_registration(&form).unwrap_err().get("username").is_empty());

        form.username = "a".repeat(21);
        assert!(!validate_registration(&form).unwrap_err().get("username").is_empty());

        form.username = "a".repeat(20);
        assert!(validate_registration(&form).is_ok());
    }

    #[test]
    fn username_rejects_spaces_and_slashes() {
        for bad in ["al ice", "al/ice", "alice?"] {
            let mut form = valid_form();
            form.username = bad.to_string();
            let errors = validate_registration(&form).unwrap_err();
            assert!(!errors.get("username").is_empty(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let mut form = valid_form();
        form.password = "short".to_string();
        let errors = validate_registration(&form).unwrap_err();
        assert!(!errors.get("password").is_empty());
        assert!(errors.get("username").is_empty());
    }

    #[test]
    fn email_must_be_valid_and_short() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        assert!(!validate_registration(&form).unwrap_err().get("email").is_empty());

        form.email = format!("{}@example.com", "a".repeat(45));
        assert!(!validate_registration(&form).unwrap_err().get("email").is_empty());
    }

    #[test]
    fn names_are_required_and_bounded() {
        let mut form = valid_form();
        form.first_name = "   ".to_string();
        form.last_name = "L".repeat(31);
        let errors = validate_registration(&form).unwrap_err();
        assert!(!errors.get("first_name").is_empty());
        assert!(!errors.get("last_name").is_empty());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate_registration(&RegisterForm::default()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["email", "first_name", "last_name", "password", "username"]);
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&LoginForm::default()).unwrap_err();
        assert!(!errors.get("username").is_empty());
        assert!(!errors.get("password").is_empty());

        let form = LoginForm {
            username: "alice".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(&form).is_ok());
    }

    #[test]
    fn debug_output_hides_passwords() {
        let registration = validate_registration(&valid_form()).unwrap();
        let rendered = format!("{:?}", registration);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("longpassword"));

        let form = LoginForm {
            username: "alice".to_string(),
            password: "hunter22".to_string(),
        };
        let rendered = format!("{:?}", validate_login(&form).unwrap());
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn zeroize_clears_only_the_password() {
        let mut form = valid_form();
        form.zeroize();
        assert!(form.password.is_empty());
        assert_eq!(form.username, "alice");
        assert_eq!(form.email, "a@x.com");
    }
}
