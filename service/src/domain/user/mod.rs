//! [`Identity`] and user account definitions.

pub mod credential;

use std::{str::FromStr, sync::LazyLock};

use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret, SecretBox};

pub use self::credential::{Claims, Credential, MalformedCredential};

/// Authenticated principal derived from a [`Credential`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    /// [`Subject`] of this [`Identity`].
    pub subject: Subject,

    /// Privilege marker of this [`Identity`], if the [`Credential`] carries
    /// any.
    pub role: Option<Role>,

    /// [`DateTime`] when the [`Credential`] this [`Identity`] is derived from
    /// expires, as claimed by its issuer.
    ///
    /// Informational only: nothing is refused once it passes.
    ///
    /// [`DateTime`]: common::DateTime
    pub expires_at: Option<ExpirationDateTime>,
}

/// Subject of an [`Identity`] (conventionally an email or a user ID).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Subject(String);

impl Subject {
    /// Creates a new [`Subject`] if the given `subject` is not empty.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Option<Self> {
        let subject = subject.into();
        (!subject.is_empty()).then_some(Self(subject))
    }
}

impl FromStr for Subject {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Subject`")
    }
}

/// Privilege marker of an [`Identity`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Role(String);

impl Role {
    /// Creates a new [`Role`] if the given `role` is not blank.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Option<Self> {
        let role = role.into();
        (!role.trim().is_empty()).then_some(Self(role))
    }
}

/// Username of an account registered at the authentication service.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] if the given `username` is valid.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        Self::check(&username).then_some(Self(username))
    }

    /// Checks whether the given `username` is a valid [`Username`].
    fn check(username: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Username`] invariants:
        /// - Must not be empty;
        /// - Must not contain whitespace;
        /// - Must not contain control characters;
        /// - Must be at most 128 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s\p{Cc}]{1,128}$").expect("valid regex")
        });

        REGEX.is_match(username.as_ref())
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

/// Password of an account registered at the authentication service.
#[derive(Clone, Debug, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() > 1 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [`Username`] and [`Password`] pair exchanged for a [`Credential`].
#[derive(Clone, Debug)]
pub struct Credentials {
    /// [`Username`] of the account.
    pub username: Username,

    /// [`Password`] of the account.
    pub password: SecretBox<Password>,
}

/// [`DateTime`] when a [`Credential`] expires.
///
/// [`DateTime`]: common::DateTime
pub type ExpirationDateTime = DateTimeOf<(Credential, unit::Expiration)>;
