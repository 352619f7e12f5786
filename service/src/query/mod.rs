//! [`Query`] definition.

pub mod post;
pub mod posts;

use derive_more::{Display, Error as StdError, From};

use crate::infra::backend;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;

/// Error of [`Query`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Nobody is logged in.
    #[display("Not authenticated")]
    #[from(ignore)]
    NotAuthenticated,

    /// [`Backend`] error.
    ///
    /// [`Backend`]: crate::infra::Backend
    #[display("Loading posts failed: {_0}")]
    Backend(backend::Error),
}
