//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::{authz, domain::user::Subject, infra::Url};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Post Service configuration.
    pub backend: Backend,

    /// Session persistence configuration.
    pub session: Session,

    /// Authorization policy configuration.
    pub policy: Policy,

    /// Tag suggestion configuration.
    pub tags: Tags,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Post Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Backend {
    /// Base URL of the Post Service.
    #[default("http://127.0.0.1:5000".to_owned())]
    pub url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Paths of the Post Service endpoints.
    pub endpoints: Endpoints,
}

impl TryFrom<Backend> for service::infra::backend::http::Config {
    type Error = ConfigError;

    fn try_from(value: Backend) -> Result<Self, Self::Error> {
        let Backend {
            url,
            timeout,
            endpoints:
                Endpoints {
                    list,
                    create,
                    update,
                    delete,
                    sign_in,
                    sign_up,
                },
        } = value;

        Ok(Self {
            url: url.parse::<Url>().map_err(|e| {
                ConfigError::Message(format!("invalid `backend.url`: {e}"))
            })?,
            timeout,
            endpoints: service::infra::backend::http::Endpoints {
                list,
                create,
                update,
                delete,
                sign_in,
                sign_up,
            },
        })
    }
}

/// Paths of the Post Service endpoints.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Endpoints {
    /// Listing all the posts.
    #[default("/read".to_owned())]
    pub list: String,

    /// Creating a post.
    #[default("/create".to_owned())]
    pub create: String,

    /// Updating a post.
    #[default("/update".to_owned())]
    pub update: String,

    /// Deleting a post.
    #[default("/delete".to_owned())]
    pub delete: String,

    /// Signing in.
    #[default("/login".to_owned())]
    pub sign_in: String,

    /// Registering an account.
    #[default("/user_creation".to_owned())]
    pub sign_up: String,
}

/// Session persistence configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Directory the credential is persisted in.
    #[default(PathBuf::from(".blog"))]
    pub dir: PathBuf,
}

/// Authorization policy configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Policy {
    /// Kind of the policy.
    pub kind: PolicyKind,

    /// Subject of the administrator, used by [`PolicyKind::SingleAdmin`].
    #[default("admin@gmail.com".to_owned())]
    pub admin: String,
}

/// Kind of the authorization policy.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Authors manage their own posts.
    Ownership,

    /// A single administrator manages every post.
    #[default]
    SingleAdmin,
}

impl TryFrom<Policy> for authz::Policy {
    type Error = ConfigError;

    fn try_from(value: Policy) -> Result<Self, Self::Error> {
        let Policy { kind, admin } = value;
        Ok(match kind {
            PolicyKind::Ownership => Self::Ownership,
            PolicyKind::SingleAdmin => Self::SingleAdmin {
                admin: Subject::new(admin).ok_or_else(|| {
                    ConfigError::Message("`policy.admin` is empty".into())
                })?,
            },
        })
    }
}

/// Tag suggestion configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tags {
    /// URL of the suggestion service.
    ///
    /// Suggestions are disabled if empty.
    pub url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Minimal number of characters of a content worth suggesting tags for.
    #[default(50)]
    pub min_content_len: usize,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    Info,

    /// Designates hazardous situations.
    #[default]
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
