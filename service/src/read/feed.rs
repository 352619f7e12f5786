//! [`Feed`] of [`Post`]s.

use tracerr::Traced;
use tracing as log;

use crate::{
    command::{delete_post, Command, DeletePost},
    domain::{post, Post},
    query::{self, posts, Query},
};

/// Local state of the [`Post`]s list view.
#[derive(Clone, Debug, Default)]
pub struct Feed {
    /// [`Post`]s currently shown.
    posts: Vec<Post>,

    /// Message shown instead of the [`Post`]s when they cannot be loaded.
    banner: Option<String>,
}

impl Feed {
    /// Creates a new empty [`Feed`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`Post`]s currently shown.
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Returns the message explaining why the [`Post`]s cannot be shown, if
    /// any.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Reloads the [`Post`]s.
    ///
    /// Never fails: on any error the [`Feed`] becomes empty, and a banner is
    /// shown unless nobody is logged in.
    pub async fn refresh<Q>(&mut self, service: &Q)
    where
        Q: Query<posts::All, Ok = Vec<Post>, Err = Traced<query::Error>>,
    {
        match service.execute(posts::All).await {
            Ok(posts) => {
                self.posts = posts;
                self.banner = None;
            }
            Err(e) => {
                self.posts.clear();
                self.banner = match e.as_ref() {
                    query::Error::NotAuthenticated => None,
                    query::Error::Backend(err) => {
                        log::warn!("failed to load `Post`s: {e}");
                        Some(err.to_string())
                    }
                };
            }
        }
    }

    /// Deletes the [`Post`] with the provided [`post::Id`].
    ///
    /// The [`Post`] leaves this [`Feed`] only once the deletion is
    /// confirmed, and is returned. [`None`] is returned without deleting
    /// anything if this [`Feed`] has no such [`Post`].
    ///
    /// # Errors
    ///
    /// If the [`DeletePost`] [`Command`] fails, in which case this [`Feed`]
    /// stays unchanged.
    pub async fn delete<C>(
        &mut self,
        service: &C,
        id: &post::Id,
    ) -> Result<Option<Post>, Traced<delete_post::ExecutionError>>
    where
        C: Command<
            DeletePost,
            Ok = (),
            Err = Traced<delete_post::ExecutionError>,
        >,
    {
        let Some(post) = self.posts.iter().find(|p| p.id == *id).cloned()
        else {
            return Ok(None);
        };

        service
            .execute(DeletePost { post })
            .await
            .map_err(tracerr::wrap!())?;

        let pos = self.posts.iter().position(|p| p.id == *id);
        Ok(pos.map(|i| self.posts.remove(i)))
    }
}
