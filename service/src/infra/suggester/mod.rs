//! [`Suggester`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use common::operations::{By, Select};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::domain::post::{Body, Tag};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Tag suggestion operation.
///
/// Implementations are expected to serve
/// [`Select`]`<`[`By`]`<Vec<`[`Tag`]`>, `[`Body`]`>>`.
pub use common::Handler as Suggester;

/// [`Suggester`] error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// Tag suggestion is not configured.
    #[display("Tag suggestion is disabled")]
    Disabled,

    /// Remote service cannot be reached.
    #[cfg(feature = "http")]
    #[display("Tag suggestion service is unreachable: {_0}")]
    Unreachable(reqwest::Error),

    /// Remote service refused the request.
    #[display("Tag suggestion service rejected the request with `{_0}`")]
    Rejected(#[error(not(source))] ::http::StatusCode),

    /// Remote service responded in an unsupported shape.
    #[display("Tag suggestion service responded unexpectedly: {_0}")]
    UnrecognizedResponse(serde_json::Error),
}

/// [`Suggester`] failing every call, used when no suggestion service is
/// configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disabled;

impl Suggester<Select<By<Vec<Tag>, Body>>> for Disabled {
    type Ok = Vec<Tag>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Tag>, Body>>,
    ) -> Result<Self::Ok, Self::Err> {
        Err(tracerr::new!(Error::Disabled))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::domain::post::Body;

    use super::{Disabled, Error, Suggester as _};

    #[tokio::test]
    async fn disabled_refuses_every_call() {
        let body = Body::new("Rust ownership explained").unwrap();

        let err = Disabled.execute(Select(By::new(body))).await.unwrap_err();

        assert!(matches!(err.as_ref(), Error::Disabled));
    }
}
