//! [`Command`] for signing in.

use common::operations::{By, Delete, Insert, Keyed, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user::Credentials, Credential, Identity},
    infra::{
        backend,
        storage::{self, Key},
        Backend, Storage,
    },
    session::LoginError,
    Service,
};

use super::Command;

/// [`Command`] exchanging [`Credentials`] for a [`Credential`] and logging in
/// with it.
#[derive(Clone, Debug, From)]
pub struct SignIn {
    /// [`Credentials`] to sign in with.
    pub credentials: Credentials,
}

impl<B, S, T> Command<SignIn> for Service<B, S, T>
where
    B: Backend<
        Select<By<Credential, Credentials>>,
        Ok = Credential,
        Err = Traced<backend::Error>,
    >,
    S: Storage<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<storage::Error>,
        > + Storage<
            Insert<Keyed<Key, String>>,
            Ok = (),
            Err = Traced<storage::Error>,
        > + Storage<
            Delete<By<String, Key>>,
            Ok = (),
            Err = Traced<storage::Error>,
        >,
{
    type Ok = Identity;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignIn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignIn { credentials } = cmd;

        let credential = self
            .backend()
            .execute(Select(By::new(credentials)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        self.session()
            .login(credential)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SignIn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("Signing in failed: {_0}")]
    Backend(backend::Error),

    /// Issued [`Credential`] cannot be used.
    #[display("Issued `Credential` is unusable: {_0}")]
    Login(LoginError),
}

#[cfg(test)]
mod spec {
    use http::StatusCode;
    use secrecy::SecretBox;

    use crate::{
        authz::Policy,
        command::Command as _,
        domain::{
            user::{Credentials, Password, Username},
            Credential,
        },
        infra::storage::Key,
        session::LoginError,
        test_util::{service, token},
    };

    use super::{ExecutionError, SignIn};

    fn credentials() -> Credentials {
        Credentials {
            username: Username::new("u1").unwrap(),
            password: SecretBox::new(Box::new(Password::from("secret"))),
        }
    }

    #[tokio::test]
    async fn logs_in_with_issued_credential() {
        let (svc, backend, storage) = service(Policy::Ownership);
        svc.session().restore().await;
        *backend.issued.borrow_mut() = Some(token("u1"));

        let identity = svc
            .execute(SignIn {
                credentials: credentials(),
            })
            .await
            .unwrap();

        assert_eq!(identity.subject.to_string(), "u1");
        assert_eq!(svc.session().identity(), Some(identity));
        assert_eq!(
            storage.get(Key::CREDENTIAL).as_deref(),
            Some(token("u1").as_ref()),
        );
    }

    #[tokio::test]
    async fn surfaces_rejection_without_session() {
        let (svc, backend, _) = service(Policy::Ownership);
        svc.session().restore().await;
        *backend.reject.borrow_mut() = Some(StatusCode::UNAUTHORIZED);

        let err = svc
            .execute(SignIn {
                credentials: credentials(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Backend(_)));
        assert!(!svc.session().current().is_authenticated());
    }

    #[tokio::test]
    async fn refuses_unusable_credential() {
        let (svc, backend, _) = service(Policy::Ownership);
        svc.session().restore().await;
        *backend.issued.borrow_mut() =
            Some(Credential::new("opaque").unwrap());

        let err = svc
            .execute(SignIn {
                credentials: credentials(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Login(LoginError::MalformedCredential(_)),
        ));
        assert!(!svc.session().current().is_authenticated());
    }
}
