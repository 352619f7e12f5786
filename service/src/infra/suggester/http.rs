//! HTTP [`Suggester`] implementation.

use std::time::Duration;

use common::operations::{By, Select};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracerr::Traced;
use tracing as log;

use crate::domain::post::{Body, Tag};

use super::{Error, Suggester};

/// [`Suggester`] asking a remote service for [`Tag`]s.
#[derive(Clone, Debug)]
pub struct Http {
    /// HTTP client performing requests.
    client: reqwest::Client,

    /// URL of the suggestion endpoint.
    url: Url,
}

impl Http {
    /// Creates a new [`Http`] suggester posting to the provided `url`.
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be initialized.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, Traced<Error>> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| tracerr::new!(Error::Unreachable(e)))?;
        Ok(Self { client, url })
    }
}

/// Request of the suggestion service.
#[derive(Debug, Serialize)]
struct Request<'a> {
    /// Content to suggest [`Tag`]s for.
    #[serde(rename = "blogPostContent")]
    content: &'a str,
}

/// Response of the suggestion service.
#[derive(Debug, Deserialize)]
struct Response {
    /// Suggested tags.
    tags: Vec<String>,
}

impl Suggester<Select<By<Vec<Tag>, Body>>> for Http {
    type Ok = Vec<Tag>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Tag>, Body>>,
    ) -> Result<Self::Ok, Self::Err> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&Request {
                content: AsRef::<str>::as_ref(by.inner()),
            })
            .send()
            .await
            .map_err(|e| tracerr::new!(Error::Unreachable(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(tracerr::new!(Error::Rejected(status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| tracerr::new!(Error::Unreachable(e)))?;
        let Response { tags } = serde_json::from_slice(&body)
            .map_err(|e| tracerr::new!(Error::UnrecognizedResponse(e)))?;

        Ok(tags
            .into_iter()
            .filter_map(|t| {
                t.parse::<Tag>()
                    .map_err(|e| log::debug!("ignoring suggested tag: {e}"))
                    .ok()
            })
            .collect())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum::{routing::post, Json, Router};
    use common::operations::{By, Select};
    use reqwest::Url;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use crate::{
        domain::post::{Body, Tag},
        infra::suggester::{Disabled, Error, Suggester as _},
    };

    use super::Http;

    #[tokio::test]
    async fn posts_content_and_reads_tags() {
        let app = Router::new().route(
            "/suggest",
            post(|Json(req): Json<Value>| async move {
                let content = req["blogPostContent"].as_str().unwrap_or("");
                Json(json!({
                    "tags": [format!("len-{}", content.len()), " rust ", ""],
                }))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        }));

        let http = Http::new(
            Url::parse(&format!("http://{addr}/suggest")).unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        let tags = http
            .execute(Select(By::<Vec<Tag>, _>::new(
                Body::new("hello").unwrap(),
            )))
            .await
            .unwrap();

        assert_eq!(
            tags,
            [Tag::new("len-5").unwrap(), Tag::new("rust").unwrap()],
        );
    }

    #[tokio::test]
    async fn disabled_always_fails() {
        let err = Disabled
            .execute(Select(By::<Vec<Tag>, _>::new(
                Body::new("hello").unwrap(),
            )))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), Error::Disabled));
    }
}
