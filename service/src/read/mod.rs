//! Read models of the views.

pub mod feed;

use crate::{
    authz::{self, Action},
    domain::{Identity, Post},
};

pub use self::feed::Feed;

/// Controls to be offered for a single [`Post`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Controls {
    /// Indicator whether the [`Post`] may be edited.
    pub edit: bool,

    /// Indicator whether the [`Post`] may be deleted.
    pub delete: bool,
}

impl Controls {
    /// Decides which [`Controls`] the provided [`Identity`] is offered for the
    /// provided [`Post`] under the provided [`authz::Policy`].
    #[must_use]
    pub fn new(
        policy: &authz::Policy,
        identity: Option<&Identity>,
        post: &Post,
    ) -> Self {
        Self {
            edit: policy.allows(identity, Action::Edit(post)),
            delete: policy.allows(identity, Action::Delete(post)),
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        authz::Policy,
        domain::user::Subject,
        test_util::{post, service, token},
    };

    use super::Controls;

    #[tokio::test]
    async fn follows_session_and_policy() {
        let (svc, _, _) = service(Policy::Ownership);
        svc.session().restore().await;
        assert_eq!(svc.controls(&post("1", "u1")), Controls::default());

        _ = svc.session().login(token("u1")).await.unwrap();
        assert_eq!(
            svc.controls(&post("1", "u1")),
            Controls {
                edit: true,
                delete: true,
            },
        );
        assert_eq!(svc.controls(&post("2", "u2")), Controls::default());
    }

    #[test]
    fn admin_controls_every_post() {
        let policy = Policy::SingleAdmin {
            admin: Subject::new("admin@gmail.com").unwrap(),
        };
        let admin = token("admin@gmail.com").identity().unwrap().unwrap();
        let author = token("u1").identity().unwrap().unwrap();

        let both = Controls {
            edit: true,
            delete: true,
        };
        assert_eq!(
            Controls::new(&policy, Some(&admin), &post("1", "u1")),
            both,
        );
        assert_eq!(
            Controls::new(&policy, Some(&author), &post("1", "u1")),
            Controls::default(),
        );
    }
}
