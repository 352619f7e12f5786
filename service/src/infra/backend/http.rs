//! HTTP [`Backend`] implementation.

use std::time::Duration;

use common::operations::{By, Delete, Insert, Keyed, Select, Update};
use reqwest::{RequestBuilder, Response, Url};
use serde_json::Value;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::domain::{
    post::{self, Draft},
    user::Credentials,
    Credential, Post,
};

use super::{wire, Authorized, Backend, Error};

/// [`Http`] backend configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the Post Service.
    #[default(Url::parse("http://127.0.0.1:5000").expect("valid URL"))]
    pub url: Url,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,

    /// Paths of the Post Service endpoints.
    pub endpoints: Endpoints,
}

/// Paths of the Post Service endpoints, relative to [`Config::url`].
#[derive(Clone, Debug, SmartDefault)]
pub struct Endpoints {
    /// Listing all the [`Post`]s.
    #[default("/read".to_owned())]
    pub list: String,

    /// Creating a [`Post`].
    #[default("/create".to_owned())]
    pub create: String,

    /// Updating a [`Post`].
    #[default("/update".to_owned())]
    pub update: String,

    /// Deleting a [`Post`].
    #[default("/delete".to_owned())]
    pub delete: String,

    /// Exchanging [`Credentials`] for a [`Credential`].
    #[default("/login".to_owned())]
    pub sign_in: String,

    /// Registering an account.
    #[default("/user_creation".to_owned())]
    pub sign_up: String,
}

/// [`Backend`] talking to the Post Service over HTTP.
#[derive(Clone, Debug)]
pub struct Http {
    /// HTTP client performing requests.
    client: reqwest::Client,

    /// Base URL of the Post Service.
    url: Url,

    /// Paths of the Post Service endpoints.
    endpoints: Endpoints,
}

impl Http {
    /// Creates a new [`Http`] backend with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be initialized.
    pub fn new(conf: Config) -> Result<Self, Traced<Error>> {
        let Config {
            url,
            timeout,
            endpoints,
        } = conf;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| tracerr::new!(Error::Client(e)))?;

        Ok(Self {
            client,
            url,
            endpoints,
        })
    }

    /// Resolves the provided endpoint `path` against the base URL, keeping
    /// its path prefix.
    fn url(&self, path: &str) -> Url {
        let mut url = self.url.clone();
        let full = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/'),
        );
        url.set_path(&full);
        url
    }

    /// Sends the provided request, turning a non-success status into
    /// [`Error::Rejected`].
    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<Response, Traced<Error>> {
        let response = request
            .send()
            .await
            .map_err(|e| tracerr::new!(Error::Unreachable(e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = wire::rejection_message(&body);
        log::debug!("Post Service rejected the request with `{status}`");
        Err(tracerr::new!(Error::Rejected { status, message }))
    }

    /// Reads the JSON body of the provided [`Response`].
    async fn json(response: Response) -> Result<Value, Traced<Error>> {
        let body = response
            .bytes()
            .await
            .map_err(|e| tracerr::new!(Error::Unreachable(e)))?;
        serde_json::from_slice(&body)
            .map_err(wire::UnrecognizedResponse::from)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Backend<Authorized<Select<By<Vec<Post>, ()>>>> for Http {
    type Ok = Vec<Post>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Authorized<Select<By<Vec<Post>, ()>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .client
            .get(self.url(&self.endpoints.list))
            .bearer_auth(op.credential.as_ref());
        let body = Self::json(self.send(request).await?).await?;

        wire::posts(body).map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Backend<Authorized<Insert<Draft>>> for Http {
    type Ok = post::Id;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Authorized<Insert<Draft>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Insert(draft) = &op.operation;
        let request = self
            .client
            .post(self.url(&self.endpoints.create))
            .bearer_auth(op.credential.as_ref())
            .json(&wire::NewPost::from(draft));
        let body = Self::json(self.send(request).await?).await?;

        wire::created_id(body).map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Backend<Authorized<Update<Keyed<post::Id, Draft>>>> for Http {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Authorized<Update<Keyed<post::Id, Draft>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Update(Keyed { key: id, value: draft }) = &op.operation;
        let request = self
            .client
            .put(self.url(&self.endpoints.update))
            .bearer_auth(op.credential.as_ref())
            .query(&[
                ("blog_id", AsRef::<str>::as_ref(id)),
                ("title", AsRef::<str>::as_ref(&draft.title)),
                ("body", AsRef::<str>::as_ref(&draft.body)),
            ]);
        drop(self.send(request).await?);

        Ok(())
    }
}

impl Backend<Authorized<Delete<By<Post, post::Id>>>> for Http {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Authorized<Delete<By<Post, post::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Delete(by) = &op.operation;
        let id: &str = by.inner().as_ref();
        let request = self
            .client
            .delete(self.url(&self.endpoints.delete))
            .bearer_auth(op.credential.as_ref())
            .query(&[("blog_id", id)]);
        drop(self.send(request).await?);

        Ok(())
    }
}

impl Backend<Select<By<Credential, Credentials>>> for Http {
    type Ok = Credential;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Credential, Credentials>>,
    ) -> Result<Self::Ok, Self::Err> {
        let credentials = by.into_inner();
        let request = self
            .client
            .post(self.url(&self.endpoints.sign_in))
            .form(&wire::Account::from(&credentials));
        let body = Self::json(self.send(request).await?).await?;

        wire::issued_credential(body)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Backend<Insert<Credentials>> for Http {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(credentials): Insert<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .client
            .post(self.url(&self.endpoints.sign_up))
            .json(&wire::Account::from(&credentials));
        drop(self.send(request).await?);

        Ok(())
    }
}
