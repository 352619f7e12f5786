//! [`Command`] for updating a [`Post`].

use common::operations::{Keyed, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    authz::{Action, ActionKind},
    domain::{
        post::{self, Draft},
        Post,
    },
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

use super::Command;

/// [`Command`] for replacing the title and the body of an existing [`Post`].
///
/// The Post Service stores no tags on update, so the [`Post`] keeps its
/// current [`Tags`] whatever the [`Draft`] carries.
///
/// [`Tags`]: post::Tags
#[derive(Clone, Debug)]
pub struct UpdatePost {
    /// [`Post`] to update, as it was last read.
    pub post: Post,

    /// New contents of the [`Post`].
    pub draft: Draft,
}

impl<B, S, T> Command<UpdatePost> for Service<B, S, T>
where
    B: Backend<
        Authorized<Update<Keyed<post::Id, Draft>>>,
        Ok = (),
        Err = Traced<backend::Error>,
    >,
{
    /// Updated [`Post`], once the Post Service confirms the update.
    type Ok = Post;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdatePost) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePost { post, mut draft } = cmd;

        let (credential, identity) = self
            .session()
            .current()
            .into_authenticated()
            .ok_or(E::NotAuthenticated)
            .map_err(tracerr::wrap!())?;

        if !self.config().policy.allows(Some(&identity), Action::Edit(&post)) {
            return Err(tracerr::new!(E::Forbidden(ActionKind::Edit)));
        }

        if draft.tags != post.tags {
            log::warn!("tags of post `{}` are kept as is on update", post.id);
            draft.tags = post.tags.clone();
        }

        self.backend()
            .execute(Authorized::new(
                credential,
                Update(Keyed {
                    key: post.id.clone(),
                    value: draft.clone(),
                }),
            ))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(post.edited(draft))
    }
}

/// Error of [`UpdatePost`] [`Command`] execution.
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
    #[display("Updating the post failed: {_0}")]
    Backend(backend::Error),
}
