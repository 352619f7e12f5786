//! [`Backend`]-related implementations.
//!
//! [`Backend`] is the remote Post Service together with its authentication
//! endpoints. It stays the authority on every decision: whatever it rejects
//! is rejected, regardless of the local [`Policy`].
//!
//! [`Policy`]: crate::authz::Policy

#[cfg(feature = "http")]
pub mod http;
pub mod wire;

use derive_more::{Display, Error as StdError, From};

use crate::domain::Credential;

#[cfg(feature = "http")]
pub use self::http::Http;
pub use self::wire::UnrecognizedResponse;

/// Backend operation.
///
/// Implementations are expected to serve the following operations:
/// - [`Authorized`]`<`[`Select`]`<`[`By`]`<Vec<`[`Post`]`>, ()>>>` listing
///   all the [`Post`]s;
/// - [`Authorized`]`<`[`Insert`]`<`[`Draft`]`>>` creating a [`Post`] and
///   returning its [`post::Id`];
/// - [`Authorized`]`<`[`Update`]`<`[`Keyed`]`<`[`post::Id`]`, `[`Draft`]`>>>`
///   updating a [`Post`];
/// - [`Authorized`]`<`[`Delete`]`<`[`By`]`<`[`Post`]`, `[`post::Id`]`>>>`
///   deleting a [`Post`];
/// - [`Select`]`<`[`By`]`<`[`Credential`]`, `[`Credentials`]`>>` exchanging
///   [`Credentials`] for a [`Credential`];
/// - [`Insert`]`<`[`Credentials`]`>` registering a new account.
///
/// [`By`]: common::operations::By
/// [`Credentials`]: crate::domain::user::Credentials
/// [`Delete`]: common::operations::Delete
/// [`Draft`]: crate::domain::post::Draft
/// [`Insert`]: common::operations::Insert
/// [`Keyed`]: common::operations::Keyed
/// [`Post`]: crate::domain::Post
/// [`post::Id`]: crate::domain::post::Id
/// [`Select`]: common::operations::Select
/// [`Update`]: common::operations::Update
pub use common::Handler as Backend;

/// Operation performed on behalf of the [`Credential`] holder.
#[derive(Clone, Debug)]
pub struct Authorized<T> {
    /// [`Credential`] presented as a bearer token.
    pub credential: Credential,

    /// Operation itself.
    pub operation: T,
}

impl<T> Authorized<T> {
    /// Wraps the provided `operation` to be performed with the provided
    /// [`Credential`].
    #[must_use]
    pub fn new(credential: Credential, operation: T) -> Self {
        Self {
            credential,
            operation,
        }
    }
}

/// [`Backend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Backend`] refused the request.
    #[display(
        "Post Service rejected the request with `{status}`: {}",
        message.as_deref().unwrap_or("no details")
    )]
    #[from(ignore)]
    Rejected {
        /// HTTP status the request was rejected with.
        status: ::http::StatusCode,

        /// Human-readable reason, if the [`Backend`] provided any.
        message: Option<String>,
    },

    /// [`Backend`] cannot be reached.
    #[cfg(feature = "http")]
    #[display("Post Service is unreachable: {_0}")]
    #[from(ignore)]
    Unreachable(reqwest::Error),

    /// HTTP client cannot be initialized.
    #[cfg(feature = "http")]
    #[display("Failed to initialize HTTP client: {_0}")]
    #[from(ignore)]
    Client(reqwest::Error),

    /// [`Backend`] responded in an unsupported shape.
    #[display("{_0}")]
    UnrecognizedResponse(UnrecognizedResponse),
}

impl Error {
    /// Returns the HTTP status of a [`Error::Rejected`] request.
    #[must_use]
    pub fn status(&self) -> Option<::http::StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            #[cfg(feature = "http")]
            Self::Unreachable(_) | Self::Client(_) => None,
            Self::UnrecognizedResponse(_) => None,
        }
    }
}
