//! [`Query`] collection related to a single [`Post`].

use tracerr::Traced;

use crate::{
    domain::{post, Post},
    Service,
};

use super::{posts, Error, Query};

/// Queries a [`Post`] by its [`post::Id`].
///
/// The Post Service has no endpoint for reading a single [`Post`], so all of
/// them are listed and the requested one is picked.
#[derive(Clone, Debug)]
pub struct ById(pub post::Id);

impl<B, S, T> Query<ById> for Service<B, S, T>
where
    Self: Query<posts::All, Ok = Vec<Post>, Err = Traced<Error>>,
{
    type Ok = Option<Post>;
    type Err = Traced<Error>;

    async fn execute(&self, ById(id): ById) -> Result<Self::Ok, Self::Err> {
        let posts = self
            .execute(posts::All)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(posts.into_iter().find(|p| p.id == id))
    }
}
