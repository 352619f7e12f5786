//! [`Guard`] of views requiring a [`Session`].

use std::cell::Cell;

use crate::domain::Identity;

use super::Session;

/// Gate of a single view requiring somebody to be logged in.
///
/// Never decides anything until the [`Session`] is ready, and asks for a
/// redirect to the login view at most once.
#[derive(Debug, Default)]
pub struct Guard {
    /// Indicator whether the redirect has already been requested.
    redirected: Cell<bool>,
}

/// Outcome of a [`Guard::check()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Access {
    /// [`Session`] is not ready yet, so nothing can be decided.
    Pending,

    /// Somebody is logged in.
    Granted(Identity),

    /// Nobody is logged in, and the view should redirect to login now.
    Redirect,

    /// Nobody is logged in, and the redirect has already been requested.
    Redirected,
}

impl Guard {
    /// Creates a new [`Guard`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the provided [`Session`] snapshot.
    #[must_use]
    pub fn check(&self, session: &Session) -> Access {
        if !session.ready {
            return Access::Pending;
        }
        if let Some(identity) = &session.identity {
            return Access::Granted(identity.clone());
        }
        if self.redirected.replace(true) {
            Access::Redirected
        } else {
            Access::Redirect
        }
    }
}
