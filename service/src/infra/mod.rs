//! Infrastructure layer.

pub mod backend;
pub mod storage;
pub mod suggester;

/// URL of a remote service.
#[cfg(feature = "http")]
pub use reqwest::Url;

pub use self::{backend::Backend, storage::Storage, suggester::Suggester};
