/// Authorization guard predicates
///
/// Pure checks applied to the per-request [`Identity`] before any data
/// access. They never touch storage. Every resolver that reads or mutates
/// owner-scoped data calls one of these first; the scoped stores then take
/// the returned [`Principal`] so the ownership filter cannot be skipped.
///
/// # Example
///
/// ```
/// use taskgraph_shared::auth::authorization::{require_authenticated, require_role};
/// use taskgraph_shared::auth::identity::{Identity, Role};
/// use mongodb::bson::oid::ObjectId;
///
/// let identity = Identity::authenticated(ObjectId::new(), [Role::User]);
/// assert!(require_authenticated(&identity).is_ok());
/// assert!(require_role(&identity, Role::Admin).is_err());
/// ```

use mongodb::bson::oid::ObjectId;

use super::identity::{Identity, Principal, Role};
use crate::error::{DomainError, DomainResult};

/// Requires an authenticated identity
///
/// Returns the [`Principal`] proof that the scoped stores are constructed
/// from.
///
/// # Errors
///
/// Returns `DomainError::Unauthenticated` for an anonymous identity.
pub fn require_authenticated(identity: &Identity) -> DomainResult<&Principal> {
    identity
        .principal()
        .ok_or_else(|| DomainError::Unauthenticated("Authentication required".to_string()))
}

/// Requires the identity to hold a specific role
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if the role is missing. An anonymous
/// identity holds no roles, so it is rejected too.
pub fn require_role(identity: &Identity, role: Role) -> DomainResult<()> {
    if !identity.has_role(role) {
        return Err(DomainError::Forbidden(
            "Insufficient permissions".to_string(),
        ));
    }

    Ok(())
}

/// Requires the identity to be the target user, or to hold a fallback role
///
/// Used for single-user reads: a user may read their own record, an admin
/// may read anyone's.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if neither condition holds.
pub fn require_self_or_role(
    identity: &Identity,
    target_user_id: ObjectId,
    role: Role,
) -> DomainResult<()> {
    if identity.current_user_id() == Some(target_user_id) {
        return Ok(());
    }

    require_role(identity, role)
}
