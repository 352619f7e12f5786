//! Authorization [`Policy`] gating mutating actions upon [`Post`]s.
//!
//! Decisions made here are advisory: they decide which controls to offer and
//! whether to attempt a request at all, while the Post Service remains the
//! authority and its rejection always wins.

use strum::{Display, IntoStaticStr};

use crate::domain::{user::Subject, Identity, Post};

/// Authorization policy of a deployment.
///
/// Exactly one shape is configured per deployment, shapes are never mixed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Policy {
    /// Any [`Identity`] may create [`Post`]s, while only the author of a
    /// [`Post`] may edit or delete it.
    Ownership,

    /// Only the configured administrator may create, edit or delete
    /// [`Post`]s, regardless of their authorship.
    SingleAdmin {
        /// [`Subject`] of the administrator.
        admin: Subject,
    },
}

impl Policy {
    /// Decides whether the provided [`Identity`] may perform the provided
    /// [`Action`].
    ///
    /// Always `false` for an absent [`Identity`].
    #[must_use]
    pub fn allows(
        &self,
        identity: Option<&Identity>,
        action: Action<'_>,
    ) -> bool {
        let Some(identity) = identity else {
            return false;
        };

        match self {
            Self::Ownership => match action {
                Action::Create => true,
                Action::Edit(post) | Action::Delete(post) => {
                    post.author.is(&identity.subject)
                }
            },
            Self::SingleAdmin { admin } => identity.subject == *admin,
        }
    }
}

/// Mutating action upon a [`Post`].
#[derive(Clone, Copy, Debug)]
pub enum Action<'p> {
    /// Creating a new [`Post`].
    Create,

    /// Editing the existing [`Post`].
    Edit(&'p Post),

    /// Deleting the existing [`Post`].
    Delete(&'p Post),
}

impl Action<'_> {
    /// Returns the [`ActionKind`] of this [`Action`].
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Create => ActionKind::Create,
            Self::Edit(_) => ActionKind::Edit,
            Self::Delete(_) => ActionKind::Delete,
        }
    }
}

/// Kind of an [`Action`], detached from its target.
#[derive(Clone, Copy, Debug, Display, Eq, IntoStaticStr, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    /// [`Action::Create`].
    Create,

    /// [`Action::Edit`].
    Edit,

    /// [`Action::Delete`].
    Delete,
}
