//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::infra::{backend, storage, suggester};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[exit = $exit_code:literal]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            exit_code: $exit_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`] of a CLI command.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// Process exit code of this [`Error`].
    pub exit_code: u8,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            exit_code: 1,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            exit_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for backend::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Rejected { .. } => Some(Error {
                code: "REMOTE_REJECTED",
                exit_code: 5,
                message: self.to_string(),
                backtrace: None,
            }),
            Self::Unreachable(_) => Some(Error {
                code: "NETWORK_UNREACHABLE",
                exit_code: 6,
                message: self.to_string(),
                backtrace: None,
            }),
            Self::Client(_) | Self::UnrecognizedResponse(_) => None,
        }
    }
}

impl AsError for storage::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for suggester::Error {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SUGGESTIONS_DISABLED"]
                #[exit = 7]
                #[message = "Tag suggestion is not configured"]
                Disabled,
            }
        }

        match self {
            Self::Disabled => Some(Error::Disabled.into()),
            Self::Unreachable(_)
            | Self::Rejected(_)
            | Self::UnrecognizedResponse(_) => Some(crate::Error {
                code: "SUGGESTION_FAILED",
                exit_code: 7,
                message: self.to_string(),
                backtrace: None,
            }),
        }
    }
}

define_error! {
    enum SessionError {
        #[code = "NOT_AUTHENTICATED"]
        #[exit = 3]
        #[message = "Not logged in, run `blog sign-in` first"]
        NotAuthenticated,

        #[code = "FORBIDDEN"]
        #[exit = 4]
        #[message = "Not allowed to do this"]
        Forbidden,
    }
}

#[cfg(test)]
mod spec {
    use std::io;

    use service::infra::{backend, storage};

    use super::{AsError as _, Error, SessionError};

    #[test]
    fn maps_rejection() {
        let err = backend::Error::Rejected {
            status: http::StatusCode::FORBIDDEN,
            message: Some("Not your post".into()),
        }
        .as_error();

        assert_eq!(err.code, "REMOTE_REJECTED");
        assert_eq!(err.exit_code, 5);
        assert_eq!(
            err.message,
            "Post Service rejected the request with `403 Forbidden`: \
             Not your post",
        );
    }

    #[test]
    fn unknown_errors_are_internal() {
        let err = tracerr::new!(storage::Error::Unavailable(io::Error::other(
            "disk is gone",
        )))
        .as_error();

        assert_eq!(err.code, "INTERNAL_ERROR");
        assert_eq!(err.exit_code, 1);
    }

    #[test]
    fn traced_errors_keep_backtrace() {
        let err = tracerr::new!(backend::Error::Rejected {
            status: http::StatusCode::UNAUTHORIZED,
            message: None,
        })
        .as_error();

        assert!(err.backtrace.is_some());
        assert!(err.to_string().starts_with("[REMOTE_REJECTED]: "));
    }

    #[test]
    fn defined_errors_convert() {
        let err = Error::from(SessionError::NotAuthenticated);

        assert_eq!(err.code, "NOT_AUTHENTICATED");
        assert_eq!(err.exit_code, 3);
        assert_eq!(
            err.to_string(),
            "[NOT_AUTHENTICATED]: Not logged in, run `blog sign-in` first",
        );
    }
}
