//! [`Storage`]-related implementations.
//!
//! [`Storage`] is the client-persistent key-value store a [`session::Store`]
//! keeps its [`Credential`] in. Nothing else touches it.
//!
//! [`Credential`]: crate::domain::Credential
//! [`session::Store`]: crate::session::Store

pub mod file;
#[cfg(test)]
pub mod memory;

use std::io;

use derive_more::{Display, Error as StdError, From};

#[cfg(test)]
pub use self::memory::Memory;
pub use self::file::File;

/// Storage operation.
///
/// Implementations are expected to serve the following operations:
/// - [`Select`]`<`[`By`]`<Option<String>, `[`Key`]`>>` reading a value;
/// - [`Insert`]`<`[`Keyed`]`<`[`Key`]`, String>>` writing a value;
/// - [`Delete`]`<`[`By`]`<String, `[`Key`]`>>` removing a value, succeeding
///   when there is nothing to remove.
///
/// [`By`]: common::operations::By
/// [`Delete`]: common::operations::Delete
/// [`Insert`]: common::operations::Insert
/// [`Keyed`]: common::operations::Keyed
/// [`Select`]: common::operations::Select
pub use common::Handler as Storage;

/// Key a value is persisted under in a [`Storage`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Key(&'static str);

impl Key {
    /// [`Key`] of the persisted [`Credential`].
    ///
    /// [`Credential`]: crate::domain::Credential
    pub const CREDENTIAL: Self = Self("accessToken");

    /// Returns this [`Key`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Storage`] cannot be read or written.
    #[display("`Storage` is unavailable: {_0}")]
    Unavailable(io::Error),
}
