//! [`Post`] definitions.

use std::{slice, str::FromStr};

use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};

use super::user::Subject;

/// Blog post persisted by the Post Service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Post {
    /// ID of this [`Post`].
    pub id: Id,

    /// [`Title`] of this [`Post`].
    pub title: Title,

    /// [`Body`] of this [`Post`].
    pub body: Body,

    /// [`Author`] of this [`Post`].
    pub author: Author,

    /// [`Tags`] of this [`Post`].
    pub tags: Tags,

    /// [`DateTime`] when this [`Post`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Post`] was last modified.
    ///
    /// [`DateTime`]: common::DateTime
    pub updated_at: ModificationDateTime,

    /// Indicator whether the Post Service omitted the timestamps of this
    /// [`Post`], so they were assigned locally at the moment of reading.
    pub dates_assigned: bool,
}

impl Post {
    /// Maximum number of characters in a [`Post::snippet()`].
    const SNIPPET_LEN: usize = 100;

    /// Returns a short preview of this [`Post`]'s [`Body`].
    #[must_use]
    pub fn snippet(&self) -> String {
        let body: &str = self.body.as_ref();
        match body.char_indices().nth(Self::SNIPPET_LEN) {
            Some((end, _)) => format!("{}...", &body[..end]),
            None => body.to_owned(),
        }
    }

    /// Applies the provided [`Draft`] to this [`Post`], as it has been
    /// accepted by the Post Service.
    #[must_use]
    pub fn edited(self, draft: Draft) -> Self {
        let Draft { title, body, tags } = draft;
        Self {
            title,
            body,
            tags,
            updated_at: ModificationDateTime::now(),
            ..self
        }
    }
}

/// Contents of a [`Post`] submitted for creation or update.
///
/// Authorship is deliberately absent: the Post Service derives it from the
/// bearer credential.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// [`Title`] of the [`Post`].
    pub title: Title,

    /// [`Body`] of the [`Post`].
    pub body: Body,

    /// [`Tags`] of the [`Post`].
    pub tags: Tags,
}

impl From<&Post> for Draft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            body: post.body.clone(),
            tags: post.tags.clone(),
        }
    }
}

/// ID of a [`Post`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Id(String);

impl Id {
    /// Creates a new [`Id`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.is_empty() && id.trim() == id).then_some(Self(id))
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `post::Id`")
    }
}

/// Title of a [`Post`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is not blank.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        (!title.trim().is_empty()).then_some(Self(title))
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Body (content) of a [`Post`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Body(String);

impl Body {
    /// Creates a new [`Body`] if the given `body` is not blank.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Option<Self> {
        let body = body.into();
        (!body.trim().is_empty()).then_some(Self(body))
    }

    /// Returns the number of characters in this [`Body`].
    #[must_use]
    pub fn chars_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl FromStr for Body {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Body`")
    }
}

/// Reference to the author of a [`Post`], as reported by the Post Service.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Author(String);

impl Author {
    /// Creates a new [`Author`] if the given `author` is not empty.
    #[must_use]
    pub fn new(author: impl Into<String>) -> Option<Self> {
        let author = author.into();
        (!author.is_empty()).then_some(Self(author))
    }

    /// Checks whether this [`Author`] refers to the provided [`Subject`].
    #[must_use]
    pub fn is(&self, subject: &Subject) -> bool {
        AsRef::<str>::as_ref(subject) == self.0
    }
}

/// Tag of a [`Post`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(str, String)]
pub struct Tag(String);

impl Tag {
    /// Maximum number of characters in a [`Tag`].
    const MAX_LEN: usize = 64;

    /// Creates a new [`Tag`] if the given `tag` is valid.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into();
        Self::check(&tag).then_some(Self(tag))
    }

    /// Checks whether the given `tag` is a valid [`Tag`].
    fn check(tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref();
        !tag.is_empty()
            && tag.trim() == tag
            && tag.chars().count() <= Self::MAX_LEN
            && !tag.chars().any(char::is_control)
    }
}

impl FromStr for Tag {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim()).ok_or("invalid `Tag`")
    }
}

/// Ordered set of [`Tag`]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Inserts the provided [`Tag`], unless it's already present.
    ///
    /// Returns `true` if the [`Tag`] was inserted.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Merges the provided [`Tag`]s into these [`Tags`], preserving the order
    /// of the existing ones.
    pub fn merge(&mut self, tags: impl IntoIterator<Item = Tag>) {
        for tag in tags {
            _ = self.insert(tag);
        }
    }

    /// Checks whether these [`Tags`] contain the provided [`Tag`].
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Returns an iterator over these [`Tags`].
    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.0.iter()
    }

    /// Returns the number of [`Tags`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether there are no [`Tags`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        let mut tags = Self::default();
        tags.merge(iter);
        tags
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [`DateTime`] when a [`Post`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Post, unit::Creation)>;

/// [`DateTime`] when a [`Post`] was last modified.
///
/// [`DateTime`]: common::DateTime
pub type ModificationDateTime = DateTimeOf<(Post, unit::Modification)>;

#[cfg(test)]
mod spec {
    use crate::domain::user::Subject;

    use super::{
        Author, Body, CreationDateTime, Draft, Id, ModificationDateTime,
        Post, Tag, Tags, Title,
    };

    fn tag(s: &str) -> Tag {
        Tag::new(s).unwrap()
    }

    fn post(body: &str) -> Post {
        Post {
            id: Id::new("1").unwrap(),
            title: Title::new("Hello").unwrap(),
            body: Body::new(body).unwrap(),
            author: Author::new("a@b.com").unwrap(),
            tags: Tags::default(),
            created_at: CreationDateTime::UNIX_EPOCH,
            updated_at: ModificationDateTime::UNIX_EPOCH,
            dates_assigned: false,
        }
    }

    #[test]
    fn tag_format() {
        assert!(Tag::new("rust").is_some());
        assert!(Tag::new("web dev").is_some());

        assert!(Tag::new("").is_none());
        assert!(Tag::new(" rust").is_none());
        assert!(Tag::new("a\nb").is_none());
        assert!(Tag::new("x".repeat(65)).is_none());

        assert_eq!(" rust ".parse::<Tag>().unwrap(), tag("rust"));
    }

    #[test]
    fn tags_keep_order_without_duplicates() {
        let mut tags = [tag("b"), tag("a"), tag("b")]
            .into_iter()
            .collect::<Tags>();
        assert_eq!(tags.len(), 2);

        assert!(!tags.insert(tag("a")));
        tags.merge([tag("c"), tag("a"), tag("d")]);

        assert_eq!(
            tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["b", "a", "c", "d"],
        );
    }

    #[test]
    fn blank_title_and_body_are_rejected() {
        assert!(Title::new("  ").is_none());
        assert!(Body::new("\n").is_none());
        assert!(Id::new("").is_none());
        assert!(Id::new(" 1").is_none());
    }

    #[test]
    fn snippet_is_truncated() {
        assert_eq!(post("short").snippet(), "short");

        let long = "é".repeat(150);
        let snippet = post(&long).snippet();
        assert_eq!(snippet.chars().count(), 103);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn author_matches_subject() {
        let author = Author::new("a@b.com").unwrap();

        assert!(author.is(&Subject::new("a@b.com").unwrap()));
        assert!(!author.is(&Subject::new("A@b.com").unwrap()));
    }

    #[test]
    fn edited_replaces_contents() {
        let original = post("old body");
        let draft = Draft {
            title: Title::new("New").unwrap(),
            body: Body::new("new body").unwrap(),
            tags: [tag("x")].into_iter().collect(),
        };

        let edited = original.clone().edited(draft.clone());

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.author, original.author);
        assert_eq!(Draft::from(&edited), draft);
        assert_ne!(edited.updated_at, original.updated_at);
        assert_eq!(edited.created_at, original.created_at);
    }
}
