//! [`Command`] definition.

pub mod create_post;
pub mod delete_post;
pub mod sign_in;
pub mod sign_up;
pub mod suggest_tags;
pub mod update_post;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_post::CreatePost, delete_post::DeletePost, sign_in::SignIn,
    sign_up::SignUp, suggest_tags::SuggestTags, update_post::UpdatePost,
};
