//! User accounts and roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{Email, UserId};

/// Validation errors for [`Username`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameError {
    Blank,
    TooShort { min: usize },
    TooLong { max: usize },
}

impl fmt::Display for UsernameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "username must not be empty"),
            Self::TooShort { min } => write!(f, "username must be at least {min} characters"),
            Self::TooLong { max } => write!(f, "username must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UsernameError {}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 2;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Unique, human readable account name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, UsernameError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Blank);
        }
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UsernameError::TooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UsernameError::TooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Derive a username from a display name such as a Google profile name.
    ///
    /// Whitespace collapses to underscores and the result is padded or cut to
    /// the allowed length. `suffix` disambiguates collisions.
    pub fn derive_from(display: &str, suffix: Option<u32>) -> Self {
        let mut base: String = display
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
            .take(USERNAME_MAX - 8)
            .collect();
        if base.chars().count() < USERNAME_MIN {
            base = "rider".to_owned();
        }
        match suffix {
            Some(n) => Self(format!("{base}_{n}")),
            None => Self(base),
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authorisation role attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Stable administrator: manages stables, stalls, staff and finances.
    Admin,
    /// Regular account, typically a horse owner.
    #[default]
    User,
}

impl Role {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Whether the role grants administrative operations.
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown role strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Fields required to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub role: Role,
    /// PHC-formatted password hash; `None` for Google-only accounts.
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Persisted user account.
///
/// ## Invariants
/// - `email` and `username` are unique across accounts.
/// - `google_id`, when present, is unique across accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub role: Role,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("  adminUser ", Ok("adminUser"))]
    #[case("", Err(UsernameError::Blank))]
    #[case("a", Err(UsernameError::TooShort { min: USERNAME_MIN }))]
    fn username_validation(#[case] input: &str, #[case] expected: Result<&str, UsernameError>) {
        let result = Username::new(input).map(|name| name.as_ref().to_owned());
        assert_eq!(result, expected.map(str::to_owned));
    }

    #[rstest]
    #[case("Ada Lovelace", None, "Ada_Lovelace")]
    #[case("Ada Lovelace", Some(2), "Ada_Lovelace_2")]
    #[case("!", None, "rider")]
    fn derives_usernames_from_profile_names(
        #[case] display: &str,
        #[case] suffix: Option<u32>,
        #[case] expected: &str,
    ) {
        assert_eq!(Username::derive_from(display, suffix).as_ref(), expected);
    }

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("user", Role::User)]
    fn role_round_trips(#[case] raw: &str, #[case] role: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(role));
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert!("owner".parse::<Role>().is_err());
    }
}
