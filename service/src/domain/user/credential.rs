//! [`Credential`] definitions.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use derive_more::{AsRef, Debug, Display, Error, From};
use serde::Deserialize;
use serde_json::Value;
use tracing as log;

use super::{ExpirationDateTime, Identity, Role, Subject};

/// Opaque bearer token issued by the authentication service.
///
/// Its signature is never verified here: the payload is only decoded to
/// derive an [`Identity`] for display and client-side authorization.
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str)]
#[debug("Credential(..)")]
pub struct Credential(String);

impl Credential {
    /// Engine decoding the payload segment once its URL-safe characters are
    /// replaced with the standard ones.
    const PAYLOAD: GeneralPurpose = GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new()
            .with_decode_padding_mode(DecodePaddingMode::Indifferent),
    );

    /// Creates a new [`Credential`] out of the given `token` with the
    /// surrounding whitespace trimmed, if it's not blank.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Decodes the [`Claims`] carried in the payload of this [`Credential`].
    ///
    /// # Errors
    ///
    /// With [`MalformedCredential`] if this [`Credential`] has less than 3
    /// segments, or its payload is not base64-encoded JSON object.
    pub fn claims(&self) -> Result<Claims, MalformedCredential> {
        use MalformedCredential as E;

        let segments = self.0.split('.').collect::<Vec<_>>();
        let &[_, payload, _, ..] = segments.as_slice() else {
            return Err(E::Segments(segments.len()));
        };

        let payload = payload.replace('-', "+").replace('_', "/");
        let bytes = Self::PAYLOAD.decode(payload)?;

        let object =
            serde_json::from_slice::<serde_json::Map<String, Value>>(&bytes)?;
        Ok(Claims::deserialize(Value::Object(object))?)
    }

    /// Derives the [`Identity`] of this [`Credential`].
    ///
    /// [`None`] is returned if the [`Credential`] decodes but carries no
    /// [`Subject`].
    ///
    /// # Errors
    ///
    /// See [`Credential::claims()`].
    pub fn identity(&self) -> Result<Option<Identity>, MalformedCredential> {
        self.claims().map(Claims::into_identity)
    }
}

/// Claims carried in the payload of a [`Credential`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Claims {
    /// Subject the [`Credential`] was issued to.
    #[serde(default)]
    pub sub: Option<Value>,

    /// Privilege marker issued by the blog backend.
    #[serde(default)]
    pub profile: Option<Value>,

    /// Generic privilege marker, used when `profile` is missing.
    #[serde(default)]
    pub role: Option<Value>,

    /// Expiration of the [`Credential`], as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<Value>,
}

impl Claims {
    /// Projects these [`Claims`] onto an [`Identity`].
    ///
    /// [`None`] is returned if there is no usable `sub` claim.
    #[must_use]
    pub fn into_identity(self) -> Option<Identity> {
        let Self {
            sub,
            profile,
            role,
            exp,
        } = self;

        Some(Identity {
            subject: sub.and_then(scalar).and_then(Subject::new)?,
            role: profile
                .and_then(scalar)
                .or_else(|| role.and_then(scalar))
                .and_then(Role::new),
            expires_at: exp.and_then(expiration),
        })
    }
}

/// Reads an `exp` claim as an [`ExpirationDateTime`].
///
/// The claim is informational only, so an unusable one is logged and
/// dropped instead of failing the decoding.
#[expect(
    clippy::cast_possible_truncation,
    reason = "sub-second precision is dropped on purpose"
)]
fn expiration(exp: Value) -> Option<ExpirationDateTime> {
    let at = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|ts| ts.trunc() as i64))
        .and_then(ExpirationDateTime::from_unix_timestamp);
    if at.is_none() {
        log::warn!("ignoring unusable `exp` claim: {exp}");
    }
    at
}

/// Renders a JSON string or number claim as a [`String`].
fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
}

/// Error of decoding a [`Credential`].
#[derive(Debug, Display, Error, From)]
pub enum MalformedCredential {
    /// [`Credential`] doesn't have enough segments.
    #[display("`Credential` has {_0} segment(s), while at least 3 expected")]
    #[from(ignore)]
    Segments(#[error(not(source))] usize),

    /// Payload segment is not valid base64.
    #[display("`Credential` payload is not valid base64: {_0}")]
    Base64(base64::DecodeError),

    /// Payload segment is not a JSON object with the expected claims.
    #[display("`Credential` payload is not a valid claims object: {_0}")]
    Json(serde_json::Error),
}
