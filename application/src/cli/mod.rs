//! CLI commands executed against the [`Service`].

pub mod account;
pub mod posts;
pub mod tags;

use service::{
    domain::Identity,
    query,
    session::{Access, Guard},
};

use crate::{args, error::SessionError, AsError, Error, Service};

/// Runs the provided [`args::Command`], returning the text to be shown.
///
/// # Errors
///
/// If the [`args::Command`] fails.
pub async fn run(
    service: &Service,
    command: args::Command,
) -> Result<String, Error> {
    use args::Command as C;

    match command {
        C::SignUp(account) => account::sign_up(service, account).await,
        C::SignIn(account) => account::sign_in(service, account).await,
        C::Login { token } => account::login(service, token).await,
        C::Logout => Ok(account::logout(service).await),
        C::Whoami => Ok(account::whoami(service)),
        C::Posts(cmd) => posts::run(service, cmd).await,
        C::Tags(cmd) => tags::run(service, cmd).await,
    }
}

/// Requires somebody to be logged in to the provided [`Service`].
///
/// # Errors
///
/// With [`SessionError::NotAuthenticated`] if nobody is.
pub fn authenticated(service: &Service) -> Result<Identity, Error> {
    match Guard::new().check(&service.session().current()) {
        Access::Granted(identity) => Ok(identity),
        Access::Redirect | Access::Redirected => {
            Err(SessionError::NotAuthenticated.into())
        }
        Access::Pending => {
            Err(Error::internal(&"`Session` has not been restored"))
        }
    }
}

impl AsError for query::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotAuthenticated => {
                Some(SessionError::NotAuthenticated.into())
            }
            Self::Backend(e) => e.try_as_error(),
        }
    }
}
