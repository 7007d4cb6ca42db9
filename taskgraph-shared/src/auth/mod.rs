/// Authentication and authorization utilities
///
/// This module provides the security primitives for TaskGraph:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`identity`]: Per-request identity context built from the session
/// - [`authorization`]: Pure guard predicates applied before data access
///
/// # Security Model
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Identity**: user id + role set captured at login time
/// - **Ownership Scoping**: guards hand out a [`identity::Principal`] proof,
///   and the scoped stores cannot be constructed without one
///
/// # Example
///
/// ```
/// use taskgraph_shared::auth::authorization::require_authenticated;
/// use taskgraph_shared::auth::identity::{Identity, Role};
/// use mongodb::bson::oid::ObjectId;
///
/// let identity = Identity::authenticated(ObjectId::new(), [Role::User]);
/// let principal = require_authenticated(&identity).expect("identity is authenticated");
/// assert_eq!(Some(principal.user_id), identity.current_user_id());
/// ```

pub mod authorization;
pub mod identity;
pub mod password;
