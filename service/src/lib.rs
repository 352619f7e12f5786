//! Service contains the business logic of the blog client.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
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

pub mod authz;
pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod session;

#[cfg(test)]
mod test_util;

#[cfg(doc)]
use infra::{Backend, Storage, Suggester};

pub use self::{command::Command, query::Query};

use self::{domain::Post, read::Controls};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`authz::Policy`] of this deployment.
    pub policy: authz::Policy,

    /// [`command::SuggestTags`] configuration.
    pub suggest_tags: command::suggest_tags::Config,
}

/// Domain service.
#[derive(Debug)]
pub struct Service<B, S, T> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Backend`] of this [`Service`].
    backend: B,

    /// [`session::Store`] of this [`Service`].
    session: session::Store<S>,

    /// [`Suggester`] of this [`Service`].
    suggester: T,
}

impl<B, S, T> Service<B, S, T> {
    /// Creates a new [`Service`] with the provided parameters.
    ///
    /// Its [`session::Store`] is not ready until
    /// [`session::Store::restore()`] is called.
    #[must_use]
    pub fn new(config: Config, backend: B, storage: S, suggester: T) -> Self {
        Self {
            config,
            backend,
            session: session::Store::new(storage),
            suggester,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Backend`] of this [`Service`].
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns [`session::Store`] of this [`Service`].
    #[must_use]
    pub fn session(&self) -> &session::Store<S> {
        &self.session
    }

    /// Returns [`Suggester`] of this [`Service`].
    #[must_use]
    pub fn suggester(&self) -> &T {
        &self.suggester
    }

    /// Returns [`Controls`] to be offered for the provided [`Post`] to the
    /// current [`session::Session`].
    #[must_use]
    pub fn controls(&self, post: &Post) -> Controls {
        Controls::new(
            &self.config.policy,
            self.session.identity().as_ref(),
            post,
        )
    }
}
