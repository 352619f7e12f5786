//! Application provides a terminal client of the blog on top of the
//! [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod args;
pub mod cli;
pub mod config;
pub mod error;

use common::operations::{By, Select};
use service::{
    authz,
    domain::post::{Body, Tag},
    infra::{backend, storage, suggester, Url},
};
use tracerr::Traced;
// Used in binary.
use tokio as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<backend::Http, storage::File, Suggester>;

/// [`suggester::Suggester`] chosen by the configuration.
#[derive(Clone, Debug)]
pub enum Suggester {
    /// Remote suggestion service.
    Http(suggester::Http),

    /// Suggestions are not configured.
    Disabled(suggester::Disabled),
}

impl Suggester {
    /// Creates a new [`Suggester`] out of the provided [`config::Tags`].
    ///
    /// # Errors
    ///
    /// If the configured URL is invalid, or the HTTP client cannot be
    /// initialized.
    pub fn new(conf: &config::Tags) -> Result<Self, Error> {
        if conf.url.is_empty() {
            return Ok(Self::Disabled(suggester::Disabled));
        }

        let url = conf.url.parse::<Url>().map_err(|e| {
            Error::internal(&format!("invalid `tags.url`: {e}"))
        })?;
        suggester::Http::new(url, conf.timeout)
            .map(Self::Http)
            .map_err(AsError::into_error)
    }
}

impl suggester::Suggester<Select<By<Vec<Tag>, Body>>> for Suggester {
    type Ok = Vec<Tag>;
    type Err = Traced<suggester::Error>;

    async fn execute(
        &self,
        op: Select<By<Vec<Tag>, Body>>,
    ) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::Http(s) => s.execute(op).await,
            Self::Disabled(s) => s.execute(op).await,
        }
    }
}

/// Initializes the [`Service`] out of the provided [`Config`] and restores
/// its [`service::session::Session`].
///
/// # Errors
///
/// If the configuration is invalid.
pub async fn init(conf: Config) -> Result<Service, Error> {
    let Config {
        backend: backend_conf,
        session,
        policy,
        tags,
        log: _,
    } = conf;

    let http = backend::http::Config::try_from(backend_conf)
        .map_err(|e| Error::internal(&e))
        .and_then(|c| backend::Http::new(c).map_err(AsError::into_error))?;
    let suggester = Suggester::new(&tags)?;

    let service = service::Service::new(
        service::Config {
            policy: authz::Policy::try_from(policy)
                .map_err(|e| Error::internal(&e))?,
            suggest_tags: service::command::suggest_tags::Config {
                min_content_len: tags.min_content_len,
            },
        },
        http,
        storage::File::new(session.dir),
        suggester,
    );
    service.session().restore().await;

    Ok(service)
}
