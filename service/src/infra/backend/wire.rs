//! Wire shapes of the Post Service, normalized into domain types.
//!
//! Every quirk of the remote representation is absorbed here: both list
//! envelopes, alternative field spellings, numeric IDs and missing
//! timestamps.

use derive_more::{Debug, Display, Error};
use secrecy::ExposeSecret as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing as log;

use crate::domain::{
    post::{self, Author, Body, Draft, Tag, Title},
    user::Credentials,
    Credential, Post,
};

/// Field spellings of a [`post::Id`].
const ID: &[&str] = &["id", "blog_id"];

/// Field spellings of a [`Body`].
const BODY: &[&str] = &["body", "content"];

/// Field spellings of an [`Author`].
const AUTHOR: &[&str] = &["author", "user_id", "author_id", "authorId"];

/// Field spellings of a [`post::CreationDateTime`].
const CREATED_AT: &[&str] = &["created_at", "createdAt"];

/// Field spellings of a [`post::ModificationDateTime`].
const UPDATED_AT: &[&str] = &["updated_at", "updatedAt"];

/// Response of the Post Service in a shape that cannot be understood.
#[derive(Clone, Debug, Display, Error)]
#[display("unrecognized Post Service response: {_0}")]
pub struct UnrecognizedResponse(#[error(not(source))] String);

impl From<serde_json::Error> for UnrecognizedResponse {
    fn from(e: serde_json::Error) -> Self {
        Self(format!("body is not valid JSON: {e}"))
    }
}

/// Parses the [`Post`]s list returned by the Post Service.
///
/// Accepts either a bare array of records or an object with a `data` array.
/// Records failing validation are skipped.
///
/// # Errors
///
/// With [`UnrecognizedResponse`] if the `body` is neither of the accepted
/// shapes.
pub fn posts(body: Value) -> Result<Vec<Post>, UnrecognizedResponse> {
    let records = match body {
        Value::Array(records) => records,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(records)) => records,
            Some(_) | None => {
                return Err(UnrecognizedResponse(
                    "object without `data` array".into(),
                ))
            }
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            return Err(UnrecognizedResponse(
                "neither an array nor an object".into(),
            ))
        }
    };

    Ok(records
        .into_iter()
        .filter_map(|record| {
            post(record)
                .map_err(|e| log::warn!("skipping `Post` record: {e}"))
                .ok()
        })
        .collect())
}

/// Parses a single [`Post`] record.
///
/// # Errors
///
/// With [`UnrecognizedResponse`] if the `record` misses a required field or
/// its value is invalid.
pub fn post(record: Value) -> Result<Post, UnrecognizedResponse> {
    let Value::Object(record) = record else {
        return Err(UnrecognizedResponse("record is not an object".into()));
    };

    let id = scalar(&record, ID)
        .and_then(post::Id::new)
        .ok_or_else(|| missing("id"))?;
    let title = string(&record, &["title"])
        .and_then(Title::new)
        .ok_or_else(|| missing("title"))?;
    let body = string(&record, BODY)
        .and_then(Body::new)
        .ok_or_else(|| missing("body"))?;
    let author = scalar(&record, AUTHOR)
        .and_then(Author::new)
        .ok_or_else(|| missing("author"))?;

    let tags = match field(&record, &["tags"]) {
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|t| t.parse::<Tag>().ok())
            .collect(),
        Some(_) | None => post::Tags::default(),
    };

    let created_at = timestamp(&record, CREATED_AT);
    let updated_at = timestamp(&record, UPDATED_AT);
    let dates_assigned = created_at.is_none() || updated_at.is_none();

    Ok(Post {
        id,
        title,
        body,
        author,
        tags,
        created_at: created_at.unwrap_or_else(post::CreationDateTime::now),
        updated_at: updated_at.unwrap_or_else(post::ModificationDateTime::now),
        dates_assigned,
    })
}

/// Parses the [`post::Id`] of a newly created [`Post`].
///
/// Accepts `{ id }`, `{ blog_id }` or `{ data: record | [record] }`.
///
/// # Errors
///
/// With [`UnrecognizedResponse`] if no ID can be found in the `body`.
pub fn created_id(body: Value) -> Result<post::Id, UnrecognizedResponse> {
    let Value::Object(obj) = body else {
        return Err(UnrecognizedResponse(
            "creation result is not an object".into(),
        ));
    };

    let record = match obj.get("data") {
        Some(Value::Object(record)) => record,
        Some(Value::Array(records)) => match records.first() {
            Some(Value::Object(record)) => record,
            Some(_) | None => &obj,
        },
        Some(_) | None => &obj,
    };

    scalar(record, ID)
        .and_then(post::Id::new)
        .ok_or_else(|| missing("id"))
}

/// Parses the [`Credential`] issued by the authentication service.
///
/// # Errors
///
/// With [`UnrecognizedResponse`] if the `body` carries no token.
pub fn issued_credential(
    body: Value,
) -> Result<Credential, UnrecognizedResponse> {
    #[derive(Deserialize)]
    struct Issued {
        access_token: String,
    }

    let Issued { access_token } = Issued::deserialize(body)
        .map_err(|e| UnrecognizedResponse(format!("no access token: {e}")))?;
    Credential::new(access_token).ok_or_else(|| missing("access_token"))
}

/// Extracts a human-readable message from the body of a rejected request.
///
/// Looks for `detail`, `message` or `error` string fields.
#[must_use]
pub fn rejection_message(body: &[u8]) -> Option<String> {
    let Ok(Value::Object(obj)) = serde_json::from_slice(body) else {
        return None;
    };
    string(&obj, &["detail", "message", "error"])
}

/// [`Draft`] of a new [`Post`] as sent to the Post Service.
#[derive(Debug, Serialize)]
pub struct NewPost<'a> {
    /// [`Title`] of the [`Post`].
    pub title: &'a str,

    /// [`Body`] of the [`Post`].
    pub body: &'a str,

    /// [`Tag`]s of the [`Post`], omitted if there are none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<&'a str>,
}

impl<'a> From<&'a Draft> for NewPost<'a> {
    fn from(draft: &'a Draft) -> Self {
        Self {
            title: draft.title.as_ref(),
            body: draft.body.as_ref(),
            tags: draft.tags.iter().map(AsRef::<str>::as_ref).collect(),
        }
    }
}

/// [`Credentials`] as sent to the authentication service.
#[derive(Debug, Serialize)]
pub struct Account<'a> {
    /// Username of the account.
    pub username: &'a str,

    /// Exposed password of the account.
    #[debug(skip)]
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for Account<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: credentials.username.as_ref(),
            password: credentials.password.expose_secret().as_ref(),
        }
    }
}

/// Returns the first non-null value among the provided field spellings.
fn field<'v>(
    obj: &'v Map<String, Value>,
    names: &[&str],
) -> Option<&'v Value> {
    names
        .iter()
        .find_map(|n| obj.get(*n).filter(|v| !v.is_null()))
}

/// Returns the first string value among the provided field spellings.
fn string(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    field(obj, names).and_then(Value::as_str).map(ToOwned::to_owned)
}

/// Returns the first string or number value among the provided field
/// spellings, rendered as a [`String`].
fn scalar(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    match field(obj, names)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
}

/// Returns the first [RFC 3339] timestamp among the provided field spellings.
///
/// Unparsable timestamps are logged and treated as missing.
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
fn timestamp<Of: ?Sized>(
    obj: &Map<String, Value>,
    names: &[&str],
) -> Option<common::DateTimeOf<Of>> {
    let raw = string(obj, names)?;
    common::DateTimeOf::from_rfc3339(&raw)
        .map_err(|e| log::warn!("ignoring timestamp `{raw}`: {e}"))
        .ok()
}

/// Creates an [`UnrecognizedResponse`] about a missing or invalid field.
fn missing(name: &str) -> UnrecognizedResponse {
    UnrecognizedResponse(format!("missing or invalid `{name}`"))
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::post::{Body, Draft, Tag, Tags, Title};

    use super::{
        created_id, issued_credential, post, posts, rejection_message,
        NewPost,
    };

    #[test]
    fn accepts_both_list_shapes() {
        let record = json!({
            "id": "p1",
            "title": "Hello",
            "body": "World",
            "author": "a@b.com",
            "tags": ["rust"],
            "created_at": "2025-07-14T10:00:00Z",
            "updated_at": "2025-07-15T10:00:00Z",
        });

        let bare = posts(json!([record.clone()])).unwrap();
        let wrapped = posts(json!({"data": [record], "count": null})).unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 1);
        let post = &bare[0];
        assert_eq!(post.id.to_string(), "p1");
        assert_eq!(post.author.to_string(), "a@b.com");
        assert_eq!(post.tags.len(), 1);
        assert_eq!(post.created_at.to_rfc3339(), "2025-07-14T10:00:00Z");
        assert!(!post.dates_assigned);
    }

    #[test]
    fn normalizes_alternative_spellings() {
        let post = post(json!({
            "blog_id": 12,
            "title": "T",
            "content": "C",
            "user_id": 7,
            "createdAt": "2025-07-14T10:00:00.5+00:00",
            "updatedAt": "2025-07-14T11:00:00+00:00",
        }))
        .unwrap();

        assert_eq!(post.id.to_string(), "12");
        assert_eq!(post.body.to_string(), "C");
        assert_eq!(post.author.to_string(), "7");
        assert!(post.tags.is_empty());
        assert!(!post.dates_assigned);

        let post = super::post(json!({
            "id": 1, "title": "T", "body": "B", "authorId": "uid-1",
        }))
        .unwrap();
        assert_eq!(post.author.to_string(), "uid-1");
    }

    #[test]
    fn assigns_missing_dates() {
        let post = post(json!({
            "id": 1, "title": "T", "body": "B", "author_id": 2,
            "created_at": "2025-07-14T10:00:00Z",
        }))
        .unwrap();
        assert!(post.dates_assigned);
        assert_eq!(post.created_at.to_rfc3339(), "2025-07-14T10:00:00Z");

        let post = super::post(json!({
            "id": 1, "title": "T", "body": "B", "author": "x",
            "created_at": "yesterday", "updated_at": null,
        }))
        .unwrap();
        assert!(post.dates_assigned);
    }

    #[test]
    fn skips_invalid_records() {
        let list = posts(json!([
            {"id": 1, "title": "T", "body": "B", "author": "x"},
            {"id": 2, "title": "", "body": "B", "author": "x"},
            {"id": 3, "title": "T", "body": "B"},
            "garbage",
        ]))
        .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id.to_string(), "1");
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(posts(json!("nope")).is_err());
        assert!(posts(json!(42)).is_err());
        assert!(posts(json!({"items": []})).is_err());
        assert!(posts(json!({"data": {"id": 1}})).is_err());
    }

    #[test]
    fn finds_created_id() {
        assert_eq!(
            created_id(json!({"id": "abc"})).unwrap().to_string(),
            "abc",
        );
        assert_eq!(created_id(json!({"blog_id": 5})).unwrap().to_string(), "5");
        assert_eq!(
            created_id(json!({"data": [{"blog_id": 6, "title": "T"}]}))
                .unwrap()
                .to_string(),
            "6",
        );
        assert_eq!(
            created_id(json!({"data": {"id": 7}})).unwrap().to_string(),
            "7",
        );

        assert!(created_id(json!({"data": []})).is_err());
        assert!(created_id(json!([{"id": 1}])).is_err());
    }

    #[test]
    fn reads_issued_credential() {
        let cred = issued_credential(json!({
            "access_token": "h.eyJzdWIiOiJ4In0.s",
            "token_type": "bearer",
        }))
        .unwrap();
        assert_eq!(cred.as_ref(), "h.eyJzdWIiOiJ4In0.s");

        assert!(issued_credential(json!({"access_token": ""})).is_err());
        assert!(issued_credential(json!({"token": "x"})).is_err());
    }

    #[test]
    fn extracts_rejection_message() {
        assert_eq!(
            rejection_message(br#"{"detail": "Admin access required"}"#)
                .as_deref(),
            Some("Admin access required"),
        );
        assert_eq!(
            rejection_message(br#"{"error": "boom"}"#).as_deref(),
            Some("boom"),
        );
        assert_eq!(rejection_message(br#"{"detail": [1]}"#), None);
        assert_eq!(rejection_message(b"Internal Server Error"), None);
    }

    #[test]
    fn omits_empty_tags() {
        let mut draft = Draft {
            title: Title::new("T").unwrap(),
            body: Body::new("B").unwrap(),
            tags: Tags::default(),
        };
        assert_eq!(
            serde_json::to_value(NewPost::from(&draft)).unwrap(),
            json!({"title": "T", "body": "B"}),
        );

        _ = draft.tags.insert(Tag::new("rust").unwrap());
        assert_eq!(
            serde_json::to_value(NewPost::from(&draft)).unwrap(),
            json!({"title": "T", "body": "B", "tags": ["rust"]}),
        );
    }
}
