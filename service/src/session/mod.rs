//! [`Session`] tracking who is logged in.

pub mod guard;

use common::operations::{By, Delete, Insert, Keyed, Select};
use derive_more::{Display, Error, From};
use tokio::sync::watch;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user::MalformedCredential, Credential, Identity},
    infra::{
        storage::{self, Key},
        Storage,
    },
};

pub use self::guard::{Access, Guard};

/// Snapshot of who is logged in.
///
/// [`Session::credential`] and [`Session::identity`] are either both present
/// or both absent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Session {
    /// [`Credential`] of the logged in user.
    pub credential: Option<Credential>,

    /// [`Identity`] derived from the [`Session::credential`].
    pub identity: Option<Identity>,

    /// Indicator whether the persisted [`Credential`] has been restored, so
    /// an absent [`Session::credential`] really means "logged out" rather
    /// than "not yet known".
    pub ready: bool,
}

impl Session {
    /// Creates a ready [`Session`] of nobody.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            credential: None,
            identity: None,
            ready: true,
        }
    }

    /// Creates a ready [`Session`] of the provided [`Identity`].
    #[must_use]
    pub fn active(credential: Credential, identity: Identity) -> Self {
        Self {
            credential: Some(credential),
            identity: Some(identity),
            ready: true,
        }
    }

    /// Indicates whether somebody is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Splits this [`Session`] into its [`Credential`] and [`Identity`], if
    /// somebody is logged in.
    #[must_use]
    pub fn into_authenticated(self) -> Option<(Credential, Identity)> {
        self.credential.zip(self.identity)
    }
}

/// Single source of truth about the current [`Session`], persisting its
/// [`Credential`] in a [`Storage`].
///
/// Changes are published through a [`watch`] channel, so every subscriber
/// observes each new [`Session`] as a whole.
#[derive(Debug)]
pub struct Store<S> {
    /// [`Storage`] the [`Credential`] is persisted in.
    storage: S,

    /// Current [`Session`].
    state: watch::Sender<Session>,
}

impl<S> Store<S> {
    /// Creates a new [`Store`] in a not yet ready state.
    ///
    /// [`Store::restore()`] is expected to be called once afterwards.
    #[must_use]
    pub fn new(storage: S) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self { storage, state }
    }

    /// Returns a snapshot of the current [`Session`].
    #[must_use]
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribes to the [`Session`] changes.
    ///
    /// The returned receiver sees the current [`Session`] immediately.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Returns the [`Credential`] of the current [`Session`], if any.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().credential.clone()
    }

    /// Returns the [`Identity`] of the current [`Session`], if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    /// Returns the [`Storage`] of this [`Store`].
    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces the current [`Session`], notifying all the subscribers.
    fn publish(&self, session: Session) {
        _ = self.state.send_replace(session);
    }

    /// Derives an [`Identity`] from the provided [`Credential`].
    fn derive(credential: &Credential) -> Result<Identity, LoginError> {
        credential.identity()?.ok_or(LoginError::MissingSubject)
    }
}

impl<S> Store<S>
where
    S: Storage<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<storage::Error>,
        > + Storage<
            Delete<By<String, Key>>,
            Ok = (),
            Err = Traced<storage::Error>,
        >,
{
    /// Restores the [`Session`] from the persisted [`Credential`], making
    /// this [`Store`] ready.
    ///
    /// Never fails: an unreadable [`Storage`] or an undecodable
    /// [`Credential`] results in no [`Session`]. An undecodable
    /// [`Credential`] is removed from the [`Storage`].
    pub async fn restore(&self) {
        let stored = self
            .storage
            .execute(Select(By::new(Key::CREDENTIAL)))
            .await
            .unwrap_or_else(|e| {
                log::warn!("failed to read persisted `Credential`: {e}");
                None
            });

        let Some(credential) = stored.and_then(Credential::new) else {
            log::debug!("no persisted `Credential` found");
            self.publish(Session::absent());
            return;
        };

        match Self::derive(&credential) {
            Ok(identity) => {
                log::debug!("restored `Session` of `{}`", identity.subject);
                self.publish(Session::active(credential, identity));
            }
            Err(e) => {
                log::warn!("discarding persisted `Credential`: {e}");
                self.publish(Session::absent());
                self.forget().await;
            }
        }
    }

    /// Logs out, removing the persisted [`Credential`].
    ///
    /// Idempotent.
    pub async fn logout(&self) {
        self.publish(Session::absent());
        self.forget().await;
    }

    /// Removes the persisted [`Credential`], logging any failure.
    async fn forget(&self) {
        if let Err(e) = self
            .storage
            .execute(Delete(By::new(Key::CREDENTIAL)))
            .await
        {
            log::error!("failed to remove persisted `Credential`: {e}");
        }
    }
}

impl<S> Store<S>
where
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
    /// Logs in with the provided [`Credential`], returning the [`Identity`]
    /// it carries.
    ///
    /// The new [`Session`] is published before the [`Credential`] is
    /// persisted, and stays active even if persisting fails.
    ///
    /// # Errors
    ///
    /// With [`LoginError`] if the [`Credential`] cannot be decoded or carries
    /// no subject. The [`Session`] is logged out then.
    pub async fn login(
        &self,
        credential: Credential,
    ) -> Result<Identity, Traced<LoginError>> {
        let identity = match Self::derive(&credential) {
            Ok(identity) => identity,
            Err(e) => {
                self.logout().await;
                return Err(tracerr::new!(e));
            }
        };

        self.publish(Session::active(credential.clone(), identity.clone()));
        log::info!("logged in as `{}`", identity.subject);

        if let Err(e) = self
            .storage
            .execute(Insert(Keyed {
                key: Key::CREDENTIAL,
                value: credential.as_ref().to_owned(),
            }))
            .await
        {
            log::error!("failed to persist `Credential`: {e}");
        }

        Ok(identity)
    }
}

/// Error of [`Store::login()`].
#[derive(Debug, Display, Error, From)]
pub enum LoginError {
    /// [`Credential`] cannot be decoded.
    #[display("Malformed `Credential`: {_0}")]
    MalformedCredential(MalformedCredential),

    /// [`Credential`] carries no subject.
    #[display("`Credential` carries no subject")]
    #[from(ignore)]
    MissingSubject,
}
