//! Account-related CLI commands.

use std::fmt::Write as _;

use secrecy::SecretBox;
use service::{
    command::{self, Command as _},
    domain::{user::Credentials, Credential, Identity},
    session::LoginError,
};

use crate::{args, define_error, AsError, Error, Service};

/// Registers the provided [`args::Account`].
///
/// # Errors
///
/// If the Post Service refuses the registration.
pub async fn sign_up(
    service: &Service,
    account: args::Account,
) -> Result<String, Error> {
    let credentials = credentials(account);
    let username = credentials.username.clone();

    service
        .execute(command::SignUp { credentials })
        .await
        .map_err(AsError::into_error)?;

    Ok(format!("Registered `{username}`, run `blog sign-in` to log in"))
}

/// Signs in with the provided [`args::Account`].
///
/// # Errors
///
/// If the Post Service refuses the [`Credentials`], or issues an unusable
/// [`Credential`].
pub async fn sign_in(
    service: &Service,
    account: args::Account,
) -> Result<String, Error> {
    let identity = service
        .execute(command::SignIn {
            credentials: credentials(account),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(render(&identity))
}

/// Logs in with the provided raw access `token`.
///
/// # Errors
///
/// If the `token` cannot be decoded or carries no subject.
pub async fn login(service: &Service, token: String) -> Result<String, Error> {
    define_error! {
        enum TokenError {
            #[code = "INVALID_TOKEN"]
            #[exit = 3]
            #[message = "Access token is empty"]
            Empty,
        }
    }

    let credential = Credential::new(token).ok_or(TokenError::Empty)?;

    let identity = service
        .session()
        .login(credential)
        .await
        .map_err(AsError::into_error)?;

    Ok(render(&identity))
}

/// Logs out.
pub async fn logout(service: &Service) -> String {
    service.session().logout().await;
    "Logged out".to_owned()
}

/// Shows who is logged in.
#[must_use]
pub fn whoami(service: &Service) -> String {
    service
        .session()
        .identity()
        .map_or_else(|| "Not logged in".to_owned(), |i| render(&i))
}

/// Builds [`Credentials`] out of the provided [`args::Account`].
fn credentials(account: args::Account) -> Credentials {
    let args::Account { username, password } = account;
    Credentials {
        username,
        password: SecretBox::new(Box::new(password)),
    }
}

/// Renders the provided [`Identity`].
fn render(identity: &Identity) -> String {
    let Identity {
        subject,
        role,
        expires_at,
    } = identity;

    let mut out = format!("Logged in as `{subject}`");
    if let Some(role) = role {
        _ = write!(out, "\nrole: {role}");
    }
    if let Some(at) = expires_at {
        _ = write!(out, "\ntoken expires at: {at}");
    }
    out
}

impl AsError for LoginError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "INVALID_TOKEN",
            exit_code: 3,
            message: format!("Access token is not usable: {self}"),
            backtrace: None,
        })
    }
}

impl AsError for command::sign_up::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Backend(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::sign_in::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[exit = 3]
                #[message = "Wrong username or password"]
                WrongCredentials,
            }
        }

        match self {
            Self::Backend(e)
                if e.status() == Some(http::StatusCode::UNAUTHORIZED) =>
            {
                Some(Error::WrongCredentials.into())
            }
            Self::Backend(e) => e.try_as_error(),
            Self::Login(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use service::domain::user::{Identity, Role, Subject};

    use super::render;

    #[test]
    fn renders_identity() {
        let identity = Identity {
            subject: Subject::new("a@b.com").unwrap(),
            role: Role::new("admin"),
            expires_at: None,
        };

        assert_eq!(render(&identity), "Logged in as `a@b.com`\nrole: admin");
    }
}
