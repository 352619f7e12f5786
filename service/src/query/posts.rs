//! [`Query`] collection related to multiple [`Post`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Post,
    infra::{
        backend::{self, Authorized},
        Backend,
    },
    Service,
};

use super::{Error, Query};

/// Queries all the [`Post`]s visible to the current [`Session`].
///
/// [`Session`]: crate::session::Session
#[derive(Clone, Copy, Debug, Default)]
pub struct All;

impl<B, S, T> Query<All> for Service<B, S, T>
where
    B: Backend<
        Authorized<Select<By<Vec<Post>, ()>>>,
        Ok = Vec<Post>,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Vec<Post>;
    type Err = Traced<Error>;

    async fn execute(&self, _: All) -> Result<Self::Ok, Self::Err> {
        let credential = self
            .session()
            .credential()
            .ok_or(Error::NotAuthenticated)
            .map_err(tracerr::wrap!())?;

        self.backend()
            .execute(Authorized::new(credential, Select(By::new(()))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))
    }
}
