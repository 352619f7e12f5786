//! [`Command`] for suggesting [`Tags`] of a [`Post`].
//!
//! [`Post`]: crate::domain::Post

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use serde::Deserialize;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::post::{Body, Tag, Tags},
    infra::{suggester, Suggester},
    Service,
};

use super::Command;

/// Configuration of [`SuggestTags`] [`Command`].
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    /// Minimal number of characters in a [`Body`] worth suggesting [`Tags`]
    /// for.
    #[default = 50]
    pub min_content_len: usize,
}

/// [`Command`] for asking the [`Suggester`] to suggest [`Tags`] for the
/// provided [`Body`] and merging them into the already chosen ones.
#[derive(Clone, Debug)]
pub struct SuggestTags {
    /// [`Body`] to suggest [`Tags`] for.
    pub body: Body,

    /// Already chosen [`Tags`].
    pub tags: Tags,
}

impl<B, S, T> Command<SuggestTags> for Service<B, S, T>
where
    T: Suggester<
        Select<By<Vec<Tag>, Body>>,
        Ok = Vec<Tag>,
        Err = Traced<suggester::Error>,
    >,
{
    /// Chosen [`Tags`] with the suggested ones appended.
    type Ok = Tags;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SuggestTags) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SuggestTags { body, mut tags } = cmd;

        let min = self.config().suggest_tags.min_content_len;
        let actual = body.chars_count();
        if actual < min {
            return Err(tracerr::new!(E::ContentTooShort { min, actual }));
        }

        let suggested = self
            .suggester()
            .execute(Select(By::new(body)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::debug!("{} `Tag`s suggested", suggested.len());

        tags.merge(suggested);
        Ok(tags)
    }
}

/// Error of [`SuggestTags`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Body`] is too short to suggest anything for.
    #[display(
        "Content is too short to suggest tags: {actual} characters, at least \
         {min} required"
    )]
    #[from(ignore)]
    ContentTooShort {
        /// Required number of characters.
        min: usize,

        /// Actual number of characters.
        actual: usize,
    },

    /// [`Suggester`] error.
    #[display("{_0}")]
    SuggestionFailed(suggester::Error),
}
