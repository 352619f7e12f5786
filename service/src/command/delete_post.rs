//! [`Command`] for deleting a [`Post`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    authz::{Action, ActionKind},
    domain::{post, Post},
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

use super::Command;

/// [`Command`] for deleting an existing [`Post`].
#[derive(Clone, Debug, From)]
pub struct DeletePost {
    /// [`Post`] to delete, as it was last read.
    pub post: Post,
}

impl<B, S, T> Command<DeletePost> for Service<B, S, T>
where
    B: Backend<
        Authorized<Delete<By<Post, post::Id>>>,
        Ok = (),
        Err = Traced<backend::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeletePost) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeletePost { post } = cmd;

        let (credential, identity) = self
            .session()
            .current()
            .into_authenticated()
            .ok_or(E::NotAuthenticated)
            .map_err(tracerr::wrap!())?;

        if !self
            .config()
            .policy
            .allows(Some(&identity), Action::Delete(&post))
        {
            return Err(tracerr::new!(E::Forbidden(ActionKind::Delete)));
        }

        self.backend()
            .execute(Authorized::new(credential, Delete(By::new(post.id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeletePost`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Nobody is logged in.
    #[display("Not authenticated")]
    #[from(ignore)]
    NotAuthenticated,

    /// [`authz::Policy`] doesn't allow the action.
    ///
    /// [`authz::Policy`]: crate::authz::Policy
    #[display("Not allowed to {_0} this post")]
    #[from(ignore)]
    Forbidden(#[error(not(source))] ActionKind),

    /// [`Backend`] error.
    #[display("Deleting the post failed: {_0}")]
    Backend(backend::Error),
}
