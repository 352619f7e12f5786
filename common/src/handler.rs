//! [`Handler`] abstractions.
//!
//! Commands, queries and infrastructure operations (storage, remote backends)
//! are all expressed as a [`Handler`] of some operation type, so callers only
//! depend on the operations they actually execute.

use std::{future::Future, rc::Rc};

/// Executable handler.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

/// Shared [`Handler`]s execute operations of the value they point to.
impl<Args, H> Handler<Args> for Rc<H>
where
    H: Handler<Args>,
{
    type Ok = H::Ok;
    type Err = H::Err;

    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>> {
        (**self).execute(args)
    }
}
