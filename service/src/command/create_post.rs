//! [`Command`] for creating a [`Post`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Post;
use crate::{
    authz::{Action, ActionKind},
    domain::post::{self, Draft},
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Post`] out of the provided [`Draft`].
///
/// Authorship is assigned by the Post Service from the presented
/// [`Credential`].
///
/// [`Credential`]: crate::domain::Credential
#[derive(Clone, Debug, From)]
pub struct CreatePost {
    /// [`Draft`] of the [`Post`] to create.
    pub draft: Draft,
}

impl<B, S, T> Command<CreatePost> for Service<B, S, T>
where
    B: Backend<
        Authorized<Insert<Draft>>,
        Ok = post::Id,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = post::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePost) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let (credential, identity) = self
            .session()
            .current()
            .into_authenticated()
            .ok_or(E::NotAuthenticated)
            .map_err(tracerr::wrap!())?;

        if !self.config().policy.allows(Some(&identity), Action::Create) {
            return Err(tracerr::new!(E::Forbidden(ActionKind::Create)));
        }

        self.backend()
            .execute(Authorized::new(credential, Insert(cmd.draft)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreatePost`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Nobody is logged in.
    #[display("Not authenticated")]
    #[from(ignore)]
    NotAuthenticated,

    /// [`authz::Policy`] doesn't allow the action.
    ///
    /// [`authz::Policy`]: crate::authz::Policy
    #[display("Not allowed to {_0} posts")]
    #[from(ignore)]
    Forbidden(#[error(not(source))] ActionKind),

    /// [`Backend`] error.
    #[display("Creating the post failed: {_0}")]
    Backend(backend::Error),
}

#[cfg(test)]
mod spec {
    use http::StatusCode;

    use crate::{
        authz::{ActionKind, Policy},
        command::Command as _,
        domain::user::Subject,
        test_util::{draft, service, token},
    };

    use super::{CreatePost, ExecutionError};

    #[tokio::test]
    async fn requires_session_before_network() {
        let (svc, backend, _) = service(Policy::Ownership);
        svc.session().restore().await;

        let err = svc
            .execute(CreatePost { draft: draft("T") })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotAuthenticated));
        assert!(backend.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn creates_under_ownership() {
        let (svc, backend, _) = service(Policy::Ownership);
        _ = svc.session().login(token("u1")).await.unwrap();

        let id = svc
            .execute(CreatePost { draft: draft("Hello") })
            .await
            .unwrap();

        let posts = backend.posts.borrow();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, id);
        assert_eq!(posts[0].author.to_string(), "u1");
    }

    #[tokio::test]
    async fn forbids_non_admin_before_network() {
        let (svc, backend, _) = service(Policy::SingleAdmin {
            admin: Subject::new("admin@gmail.com").unwrap(),
        });
        _ = svc.session().login(token("u1")).await.unwrap();

        let err = svc
            .execute(CreatePost { draft: draft("T") })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Forbidden(ActionKind::Create),
        ));
        assert_eq!(err.as_ref().to_string(), "Not allowed to create posts");
        assert!(backend.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn backend_rejection_wins() {
        let (svc, backend, _) = service(Policy::Ownership);
        _ = svc.session().login(token("u1")).await.unwrap();
        *backend.reject.borrow_mut() = Some(StatusCode::FORBIDDEN);

        let err = svc
            .execute(CreatePost { draft: draft("T") })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Backend(_)));
        assert!(backend.posts.borrow().is_empty());
    }
}
