//! [`Args`] definitions.

use clap::{Parser, Subcommand};
use service::domain::{
    post::{self, Body, Tag, Title},
    user::{Password, Username},
};

/// Terminal client of the blog.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "blog.toml")]
    pub config: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command of the blog client.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Registers a new account.
    SignUp(Account),

    /// Signs in with a username and a password.
    SignIn(Account),

    /// Logs in with an already issued access token.
    Login {
        /// Access token to log in with.
        token: String,
    },

    /// Logs out, forgetting the persisted access token.
    Logout,

    /// Shows who is logged in.
    Whoami,

    /// Manages posts.
    #[command(subcommand)]
    Posts(Posts),

    /// Manages tags.
    #[command(subcommand)]
    Tags(Tags),
}

/// Account credentials.
#[derive(Clone, derive_more::Debug, clap::Args)]
pub struct Account {
    /// Username of the account.
    #[arg(short, long)]
    pub username: Username,

    /// Password of the account.
    #[arg(short, long)]
    #[debug(skip)]
    pub password: Password,
}

/// Posts management command.
#[derive(Debug, Subcommand)]
pub enum Posts {
    /// Lists all the posts.
    List,

    /// Shows a single post.
    Show {
        /// ID of the post.
        id: post::Id,
    },

    /// Creates a new post.
    Create(Draft),

    /// Edits the title or the body of an existing post, keeping whatever
    /// is not provided. Tags cannot be changed after creation.
    Edit {
        /// ID of the post.
        id: post::Id,

        /// New title of the post.
        #[arg(short, long)]
        title: Option<Title>,

        /// New body of the post.
        #[arg(short, long)]
        body: Option<Body>,
    },

    /// Deletes a post.
    Delete {
        /// ID of the post.
        id: post::Id,
    },
}

/// Contents of a new post.
#[derive(Clone, Debug, clap::Args)]
pub struct Draft {
    /// Title of the post.
    #[arg(short, long)]
    pub title: Title,

    /// Body of the post.
    #[arg(short, long)]
    pub body: Body,

    /// Tags of the post.
    #[arg(long = "tag")]
    pub tags: Vec<Tag>,

    /// Appends suggested tags.
    #[arg(long)]
    pub suggest_tags: bool,
}

/// Tags management command.
#[derive(Debug, Subcommand)]
pub enum Tags {
    /// Suggests tags for the provided content.
    Suggest {
        /// Content to suggest tags for.
        body: Body,

        /// Already chosen tags.
        #[arg(long = "tag")]
        tags: Vec<Tag>,
    },
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::{Args, Command, Posts, Tags};

    #[test]
    fn parses_post_creation() {
        let args = Args::try_parse_from([
            "blog", "posts", "create", "-t", "Hello", "-b", "World", "--tag",
            "rust", "--tag", "web",
        ])
        .unwrap();

        assert_eq!(args.config, "blog.toml");
        let Command::Posts(Posts::Create(draft)) = args.command else {
            panic!("`posts create` expected");
        };
        assert_eq!(draft.title.to_string(), "Hello");
        assert_eq!(draft.tags.len(), 2);
        assert!(!draft.suggest_tags);
    }

    #[test]
    fn parses_tag_suggestion() {
        let args = Args::try_parse_from([
            "blog", "-c", "other.toml", "tags", "suggest", "Some content",
        ])
        .unwrap();

        assert_eq!(args.config, "other.toml");
        assert!(matches!(
            args.command,
            Command::Tags(Tags::Suggest { ref tags, .. }) if tags.is_empty(),
        ));
    }

    #[test]
    fn edit_accepts_no_tags() {
        let args =
            Args::try_parse_from(["blog", "posts", "edit", "3", "-t", "New"])
                .unwrap();
        assert!(matches!(
            args.command,
            Command::Posts(Posts::Edit { ref title, ref body, .. })
                if title.is_some() && body.is_none(),
        ));

        assert!(Args::try_parse_from([
            "blog", "posts", "edit", "3", "--tag", "rust",
        ])
        .is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Args::try_parse_from(["blog", "posts", "show", " 1"]).is_err());
        assert!(Args::try_parse_from([
            "blog", "posts", "create", "-t", "  ", "-b", "body",
        ])
        .is_err());
        assert!(Args::try_parse_from([
            "blog", "sign-in", "-u", "a b", "-p", "secret",
        ])
        .is_err());
    }
}
