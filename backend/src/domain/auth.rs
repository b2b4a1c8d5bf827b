//! Authentication primitives: credentials, registrations and token claims.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::{Email, EmailError, Role, User, UserId, Username, UsernameError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    Email(EmailError),
    Username(UsernameError),
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl CredentialsValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Username(_) => "username",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::Username(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials used by the authentication service.
///
/// # Examples
/// ```
/// use stable_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Example.com", "admin123").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@example.com");
/// assert_eq!(creds.password(), "admin123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised e-mail used for lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-service registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username).map_err(CredentialsValidationError::Username)?;
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: UserId,
    pub email: Email,
    pub role: Role,
}

impl AccessClaims {
    /// Build claims describing `user`.
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Signed access token returned to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Value suitable for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.as_str())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub user: User,
    pub token: AccessToken,
}

/// Identity asserted by Google after the OAuth code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub google_id: String,
    pub email: Email,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn login_rejects_empty_password() {
        let err = LoginCredentials::try_from_parts("a@b.co", "").expect_err("empty password");
        assert_eq!(err, CredentialsValidationError::EmptyPassword);
        assert_eq!(err.field(), "password");
    }

    #[rstest]
    fn login_rejects_malformed_email() {
        let err = LoginCredentials::try_from_parts("nope", "secret").expect_err("bad email");
        assert_eq!(err.field(), "email");
    }

    #[rstest]
    #[case("ab", "a@b.co", "12345", CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case(" ", "a@b.co", "123456", CredentialsValidationError::Username(UsernameError::Blank))]
    #[case("ab", "b.co", "123456", CredentialsValidationError::Email(EmailError::Malformed))]
    fn registration_validation(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        assert_eq!(
            Registration::try_from_parts(username, email, password),
            Err(expected)
        );
    }

    #[rstest]
    fn bearer_prefixes_token_and_debug_hides_it() {
        let token = AccessToken::new("abc.def.ghi");
        assert_eq!(token.bearer(), "Bearer abc.def.ghi");
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
    }
}
