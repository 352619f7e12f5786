//! Posts-related CLI commands.

use std::fmt::Write as _;

use itertools::Itertools as _;
use service::{
    command::{self, Command as _},
    domain::{
        post::{self, Draft, Tags},
        Post,
    },
    query::{self, Query as _},
    read::{Controls, Feed},
};
use tracing as log;

use crate::{args, define_error, error::SessionError, AsError, Error, Service};

use super::authenticated;

define_error! {
    enum PostError {
        #[code = "POST_NOT_FOUND"]
        #[exit = 8]
        #[message = "Post doesn't exist"]
        NotFound,
    }
}

/// Runs the provided [`args::Posts`] command.
///
/// # Errors
///
/// If nobody is logged in, or the command fails.
pub async fn run(service: &Service, cmd: args::Posts) -> Result<String, Error> {
    use args::Posts as P;

    _ = authenticated(service)?;

    match cmd {
        P::List => list(service).await,
        P::Show { id } => show(service, id).await,
        P::Create(draft) => create(service, draft).await,
        P::Edit { id, title, body } => edit(service, id, title, body).await,
        P::Delete { id } => delete(service, &id).await,
    }
}

/// Lists all the [`Post`]s along with the [`Controls`] offered for them.
async fn list(service: &Service) -> Result<String, Error> {
    let mut feed = Feed::new();
    feed.refresh(service).await;

    if let Some(banner) = feed.banner() {
        return Err(Error {
            code: "FEED_UNAVAILABLE",
            exit_code: 5,
            message: banner.to_owned(),
            backtrace: None,
        });
    }
    if feed.posts().is_empty() {
        return Ok("No posts yet".to_owned());
    }

    Ok(feed
        .posts()
        .iter()
        .map(|p| summary(p, service.controls(p)))
        .join("\n\n"))
}

/// Shows the [`Post`] with the provided [`post::Id`].
async fn show(service: &Service, id: post::Id) -> Result<String, Error> {
    let post = find(service, id).await?;
    Ok(render(&post, service.controls(&post)))
}

/// Creates a new [`Post`] out of the provided [`args::Draft`].
async fn create(
    service: &Service,
    draft: args::Draft,
) -> Result<String, Error> {
    let args::Draft {
        title,
        body,
        tags,
        suggest_tags,
    } = draft;

    let mut tags = tags.into_iter().collect::<Tags>();
    if suggest_tags {
        tags = suggested(service, &body, tags).await;
    }

    let id = service
        .execute(command::CreatePost {
            draft: Draft { title, body, tags },
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(format!("Created post `{id}`"))
}

/// Edits the [`Post`] with the provided [`post::Id`], keeping whatever is
/// not provided.
async fn edit(
    service: &Service,
    id: post::Id,
    title: Option<post::Title>,
    body: Option<post::Body>,
) -> Result<String, Error> {
    let post = find(service, id).await?;

    let mut draft = Draft::from(&post);
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(body) = body {
        draft.body = body;
    }

    let updated = service
        .execute(command::UpdatePost { post, draft })
        .await
        .map_err(AsError::into_error)?;

    Ok(render(&updated, service.controls(&updated)))
}

/// Deletes the [`Post`] with the provided [`post::Id`].
async fn delete(service: &Service, id: &post::Id) -> Result<String, Error> {
    let mut feed = Feed::new();
    feed.refresh(service).await;

    if let Some(banner) = feed.banner() {
        return Err(Error {
            code: "FEED_UNAVAILABLE",
            exit_code: 5,
            message: banner.to_owned(),
            backtrace: None,
        });
    }

    let deleted = feed
        .delete(service, id)
        .await
        .map_err(AsError::into_error)?
        .ok_or(PostError::NotFound)?;

    Ok(format!("Deleted post `{}`", deleted.id))
}

/// Finds the [`Post`] with the provided [`post::Id`].
async fn find(service: &Service, id: post::Id) -> Result<Post, Error> {
    service
        .execute(query::post::ById(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| PostError::NotFound.into())
}

/// Merges the [`Tags`] suggested for the provided [`post::Body`] into the
/// provided ones.
///
/// Suggestions are best-effort, so the provided [`Tags`] are returned as is
/// on any failure.
async fn suggested(service: &Service, body: &post::Body, tags: Tags) -> Tags {
    service
        .execute(command::SuggestTags {
            body: body.clone(),
            tags: tags.clone(),
        })
        .await
        .unwrap_or_else(|e| {
            log::warn!("no tags suggested: {e}");
            tags
        })
}

/// Renders a short summary of the provided [`Post`].
fn summary(post: &Post, controls: Controls) -> String {
    let mut out = header(post, controls);
    _ = write!(out, "\n    {}", post.snippet().replace('\n', " "));
    if !post.tags.is_empty() {
        _ = write!(out, "\n    tags: {}", post.tags.iter().join(", "));
    }
    out
}

/// Renders the provided [`Post`] in full.
fn render(post: &Post, controls: Controls) -> String {
    let mut out = header(post, controls);
    if !post.tags.is_empty() {
        _ = write!(out, "\ntags: {}", post.tags.iter().join(", "));
    }
    _ = write!(out, "\n\n{}", post.body);
    out
}

/// Renders the header line of the provided [`Post`].
fn header(post: &Post, controls: Controls) -> String {
    let Controls { edit, delete } = controls;

    let date = if post.dates_assigned {
        "date unknown".to_owned()
    } else {
        post.created_at.to_date_string()
    };
    let mut out =
        format!("[{}] {} by {} ({date})", post.id, post.title, post.author);
    if edit {
        out.push_str(" [edit]");
    }
    if delete {
        out.push_str(" [delete]");
    }
    out
}

impl AsError for command::create_post::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotAuthenticated => {
                Some(SessionError::NotAuthenticated.into())
            }
            Self::Forbidden(_) => Some(forbidden(self)),
            Self::Backend(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_post::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotAuthenticated => {
                Some(SessionError::NotAuthenticated.into())
            }
            Self::Forbidden(_) => Some(forbidden(self)),
            Self::Backend(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_post::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::NotAuthenticated => {
                Some(SessionError::NotAuthenticated.into())
            }
            Self::Forbidden(_) => Some(forbidden(self)),
            Self::Backend(e) => e.try_as_error(),
        }
    }
}

/// Creates a `FORBIDDEN` [`Error`] out of the provided refusal.
fn forbidden(err: &impl ToString) -> Error {
    let mut error = Error::from(SessionError::Forbidden);
    error.message = err.to_string();
    error
}
