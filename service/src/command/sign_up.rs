//! [`Command`] for registering an account.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::user::Credentials,
    infra::{backend, Backend},
    Service,
};

use super::Command;

/// [`Command`] registering a new account with the provided [`Credentials`].
///
/// Doesn't log in: a [`SignIn`] is expected afterwards.
///
/// [`SignIn`]: super::SignIn
#[derive(Clone, Debug, From)]
pub struct SignUp {
    /// [`Credentials`] of the new account.
    pub credentials: Credentials,
}

impl<B, S, T> Command<SignUp> for Service<B, S, T>
where
    B: Backend<Insert<Credentials>, Ok = (), Err = Traced<backend::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignUp) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.backend()
            .execute(Insert(cmd.credentials))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SignUp`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("Registration failed: {_0}")]
    Backend(backend::Error),
}
