//! Test doubles of the infrastructure.

use std::{cell::RefCell, rc::Rc};

use common::operations::{By, Delete, Insert, Keyed, Select, Update};
use http::StatusCode;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use tracerr::Traced;

use crate::{
    authz,
    command::suggest_tags,
    domain::{
        post::{self, Author, Body, Draft, Tag, Tags, Title},
        user::Credentials,
        Credential, Post,
    },
    infra::{
        backend::{self, Authorized},
        storage::Memory,
        suggester, Backend, Suggester,
    },
    Config, Service,
};

/// [`Service`] wired with the test doubles.
pub(crate) type TestService = Service<Rc<FakeBackend>, Memory, FixedSuggester>;

/// Mints a [`Credential`] carrying the provided subject.
pub(crate) fn token(sub: &str) -> Credential {
    let raw = jsonwebtoken::encode(
        &Header::default(),
        &json!({"sub": sub}),
        &EncodingKey::from_secret(b"secret"),
    )
    .unwrap();
    Credential::new(raw).unwrap()
}

/// Creates a [`Post`] authored by the provided subject.
pub(crate) fn post(id: &str, author: &str) -> Post {
    Post {
        id: post::Id::new(id).unwrap(),
        title: Title::new(format!("Post {id}")).unwrap(),
        body: Body::new(format!("Body of post {id}")).unwrap(),
        author: Author::new(author).unwrap(),
        tags: Tags::default(),
        created_at: post::CreationDateTime::UNIX_EPOCH,
        updated_at: post::ModificationDateTime::UNIX_EPOCH,
        dates_assigned: false,
    }
}

/// Creates a [`Draft`] with the provided title.
pub(crate) fn draft(title: &str) -> Draft {
    Draft {
        title: Title::new(title).unwrap(),
        body: Body::new("Some body").unwrap(),
        tags: Tags::default(),
    }
}

/// Creates a [`TestService`] under the provided [`authz::Policy`].
pub(crate) fn service(
    policy: authz::Policy,
) -> (TestService, Rc<FakeBackend>, Memory) {
    service_with(policy, FixedSuggester::default())
}

/// Creates a [`TestService`] under the provided [`authz::Policy`] with the
/// provided [`FixedSuggester`].
pub(crate) fn service_with(
    policy: authz::Policy,
    suggester: FixedSuggester,
) -> (TestService, Rc<FakeBackend>, Memory) {
    let backend = Rc::new(FakeBackend::default());
    let storage = Memory::default();
    let svc = Service::new(
        Config {
            policy,
            suggest_tags: suggest_tags::Config::default(),
        },
        Rc::clone(&backend),
        storage.clone(),
        suggester,
    );
    (svc, backend, storage)
}

/// In-memory [`Backend`] recording every call.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    /// [`Post`]s kept by this [`FakeBackend`].
    pub(crate) posts: RefCell<Vec<Post>>,

    /// Names of the performed operations.
    pub(crate) calls: RefCell<Vec<&'static str>>,

    /// Status every following operation is rejected with.
    pub(crate) reject: RefCell<Option<StatusCode>>,

    /// [`Credential`] issued on sign in.
    pub(crate) issued: RefCell<Option<Credential>>,
}

impl FakeBackend {
    /// Records the call of the provided operation, failing it if required.
    fn call(&self, name: &'static str) -> Result<(), Traced<backend::Error>> {
        self.calls.borrow_mut().push(name);
        match *self.reject.borrow() {
            Some(status) => Err(tracerr::new!(backend::Error::Rejected {
                status,
                message: Some(format!("{name} rejected")),
            })),
            None => Ok(()),
        }
    }
}

impl Backend<Authorized<Select<By<Vec<Post>, ()>>>> for FakeBackend {
    type Ok = Vec<Post>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Authorized<Select<By<Vec<Post>, ()>>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("list")?;
        Ok(self.posts.borrow().clone())
    }
}

impl Backend<Authorized<Insert<Draft>>> for FakeBackend {
    type Ok = post::Id;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        op: Authorized<Insert<Draft>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("create")?;
        let Insert(draft) = op.operation;
        let id = post::Id::new((self.posts.borrow().len() + 1).to_string())
            .unwrap();
        let author = op.credential.identity().unwrap().unwrap().subject;
        self.posts.borrow_mut().push(Post {
            id: id.clone(),
            title: draft.title,
            body: draft.body,
            author: Author::new(author.to_string()).unwrap(),
            tags: draft.tags,
            created_at: post::CreationDateTime::now(),
            updated_at: post::ModificationDateTime::now(),
            dates_assigned: false,
        });
        Ok(id)
    }
}

impl Backend<Authorized<Update<Keyed<post::Id, Draft>>>> for FakeBackend {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        op: Authorized<Update<Keyed<post::Id, Draft>>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("update")?;
        let Update(Keyed { key, value }) = op.operation;
        let mut posts = self.posts.borrow_mut();
        if let Some(p) = posts.iter_mut().find(|p| p.id == key) {
            *p = p.clone().edited(value);
        }
        Ok(())
    }
}

impl Backend<Authorized<Delete<By<Post, post::Id>>>> for FakeBackend {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        op: Authorized<Delete<By<Post, post::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("delete")?;
        let Delete(by) = op.operation;
        self.posts.borrow_mut().retain(|p| p.id != *by.inner());
        Ok(())
    }
}

impl Backend<Select<By<Credential, Credentials>>> for FakeBackend {
    type Ok = Credential;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Credential, Credentials>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("sign_in")?;
        Ok(self.issued.borrow().clone().unwrap_or_else(|| token("u1")))
    }
}

impl Backend<Insert<Credentials>> for FakeBackend {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Insert<Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("sign_up")
    }
}

/// [`Suggester`] always suggesting the same [`Tag`]s, or failing if there
/// are none.
#[derive(Debug, Default)]
pub(crate) struct FixedSuggester(pub(crate) Vec<Tag>);

impl Suggester<Select<By<Vec<Tag>, Body>>> for FixedSuggester {
    type Ok = Vec<Tag>;
    type Err = Traced<suggester::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Tag>, Body>>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.0.is_empty() {
            return Err(tracerr::new!(suggester::Error::Disabled));
        }
        Ok(self.0.clone())
    }
}
