/// Per-request identity context
///
/// The identity context is built exactly once per inbound request, from the
/// session record that login established, and is read-only afterwards. It is
/// the only source of truth the guards and scoped stores consult.
///
/// # Example
///
/// ```
/// use taskgraph_shared::auth::identity::{Identity, Role};
/// use mongodb::bson::oid::ObjectId;
///
/// let anonymous = Identity::anonymous();
/// assert!(anonymous.current_user_id().is_none());
/// assert!(!anonymous.has_role(Role::User));
///
/// let identity = Identity::authenticated(ObjectId::new(), [Role::Admin]);
/// assert!(identity.has_role(Role::Admin));
/// ```

use std::collections::HashSet;

use async_graphql::Enum;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Role tag attached to a user
///
/// Stored on the user document and copied into the session at login, so a
/// role change only takes effect the next time the user logs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// May read the full user collection
    Admin,

    /// Default role assigned at sign-up
    User,
}

/// Session record persisted by the session store between requests
///
/// Written at login, deleted at logout. Deliberately minimal: everything else
/// is re-read from storage on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Authenticated user id
    pub id: ObjectId,

    /// Roles held at login time
    pub roles: Vec<Role>,
}

/// Proof of authentication carried by an [`Identity`]
///
/// The ownership-scoped stores take a `&Principal`, so no data access path
/// can be written that skips [`require_authenticated`].
///
/// [`require_authenticated`]: crate::auth::authorization::require_authenticated
#[derive(Debug, Clone)]
pub struct Principal {
    /// Authenticated user id; every scoped query conjoins this
    pub user_id: ObjectId,

    /// Roles held by the user for this request
    pub roles: HashSet<Role>,
}

/// Per-request identity context
///
/// Either anonymous or carrying a [`Principal`]. Immutable for the lifetime
/// of the request.
#[derive(Debug, Clone)]
pub struct Identity {
    principal: Option<Principal>,
}

impl Identity {
    /// Creates an anonymous identity (no user, no roles)
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    /// Creates an authenticated identity
    pub fn authenticated(user_id: ObjectId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            principal: Some(Principal {
                user_id,
                roles: roles.into_iter().collect(),
            }),
        }
    }

    /// Builds the identity from the session record, if any
    pub fn from_session(session_user: Option<SessionUser>) -> Self {
        match session_user {
            Some(user) => Self::authenticated(user.id, user.roles),
            None => Self::anonymous(),
        }
    }

    /// Returns the authenticated user id, or `None` when anonymous
    pub fn current_user_id(&self) -> Option<ObjectId> {
        self.principal.as_ref().map(|p| p.user_id)
    }

    /// Checks whether the identity holds the given role
    ///
    /// Always `false` for an anonymous identity.
    pub fn has_role(&self, role: Role) -> bool {
        self.principal
            .as_ref()
            .map(|p| p.roles.contains(&role))
            .unwrap_or(false)
    }

    /// Returns the principal, or `None` when anonymous
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_identity() {
        let identity = Identity::anonymous();

        assert!(identity.current_user_id().is_none());
        assert!(identity.principal().is_none());
        assert!(!identity.has_role(Role::Admin));
        assert!(!identity.has_role(Role::User));
    }

    #[test]
    fn test_authenticated_identity() {
        let user_id = ObjectId::new();
        let identity = Identity::authenticated(user_id, [Role::User]);

        assert_eq!(identity.current_user_id(), Some(user_id));
        assert!(identity.has_role(Role::User));
        assert!(!identity.has_role(Role::Admin));
    }

    #[test]
    fn test_identity_from_session() {
        let user_id = ObjectId::new();
        let identity = Identity::from_session(Some(SessionUser {
            id: user_id,
            roles: vec![Role::Admin, Role::User],
        }));

        assert_eq!(identity.current_user_id(), Some(user_id));
        assert!(identity.has_role(Role::Admin));

        let identity = Identity::from_session(None);
        assert!(identity.current_user_id().is_none());
    }

    #[test]
    fn test_role_serialization() {
        // Role tags are stored SCREAMING_SNAKE_CASE on the user document
        let json = serde_json::to_string(&Role::Admin).expect("serialize role");
        assert_eq!(json, "\"ADMIN\"");
        let json = serde_json::to_string(&Role::User).expect("serialize role");
        assert_eq!(json, "\"USER\"");
    }
}
