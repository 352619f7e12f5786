//! Tags-related CLI commands.

use itertools::Itertools as _;
use service::command::{self, Command as _};

use crate::{args, AsError, Error, Service};

/// Runs the provided [`args::Tags`] command.
///
/// # Errors
///
/// If the content is too short, or no tags can be suggested.
pub async fn run(service: &Service, cmd: args::Tags) -> Result<String, Error> {
    match cmd {
        args::Tags::Suggest { body, tags } => {
            let tags = service
                .execute(command::SuggestTags {
                    body,
                    tags: tags.into_iter().collect(),
                })
                .await
                .map_err(AsError::into_error)?;
            Ok(tags.iter().join(", "))
        }
    }
}

impl AsError for command::suggest_tags::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ContentTooShort { .. } => Some(Error {
                code: "CONTENT_TOO_SHORT",
                exit_code: 2,
                message: self.to_string(),
                backtrace: None,
            }),
            Self::SuggestionFailed(e) => e.try_as_error(),
        }
    }
}
