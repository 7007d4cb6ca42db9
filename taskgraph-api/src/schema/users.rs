/// User queries and mutations
///
/// Sign-up is open to anonymous callers; reads are gated. A caller may
/// always fetch their own record, any other record requires the admin
/// role, and the full listing is admin only.

use async_graphql::{Context, InputObject, Object, Result, ResultExt, SimpleObject};
use mongodb::bson::oid::ObjectId;
use validator::{Validate, ValidationErrors};

use taskgraph_shared::auth::authorization::{require_role, require_self_or_role};
use taskgraph_shared::auth::identity::{Identity, Role};
use taskgraph_shared::auth::password::{hash_password, validate_password_strength};
use taskgraph_shared::error::DomainError;
use taskgraph_shared::models::user::User;
use taskgraph_shared::store::Store;

/// Sign-up request
#[derive(Debug, InputObject, Validate)]
pub struct UserSignUpInput {
    /// Desired username
    #[validate(length(min = 3, max = 32, message = "Username must be 3 to 32 characters"))]
    pub username: String,

    /// Password, checked against the strength rules before hashing
    pub password: String,
}

/// Sign-up result
#[derive(SimpleObject)]
pub struct UserSignUpPayload {
    /// The created user
    pub record: User,

    /// Id of the created user
    pub record_id: ObjectId,
}

/// `user` query fields
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Fetches a single user
    ///
    /// Callers may fetch their own record; any other record requires the
    /// admin role.
    async fn user(&self, ctx: &Context<'_>, id: ObjectId) -> Result<User> {
        let identity = ctx.data::<Identity>()?;
        require_self_or_role(identity, id, Role::Admin).extend()?;

        let store = ctx.data::<Store>()?;
        store.users().get(id).await.extend()
    }

    /// Lists all users (admin only)
    async fn user_collection(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let identity = ctx.data::<Identity>()?;
        require_role(identity, Role::Admin).extend()?;

        let store = ctx.data::<Store>()?;
        store.users().list().await.extend()
    }
}

/// `user` mutation namespace
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Creates an account
    ///
    /// Anonymous operation. Input shape and password strength are checked
    /// before any storage interaction; the username must be unused.
    async fn sign_up(
        &self,
        ctx: &Context<'_>,
        input: UserSignUpInput,
    ) -> Result<UserSignUpPayload> {
        input
            .validate()
            .map_err(|e| DomainError::InvalidInput(validation_message(&e)))
            .extend()?;
        validate_password_strength(&input.password)
            .map_err(DomainError::InvalidInput)
            .extend()?;

        let store = ctx.data::<Store>()?;
        let users = store.users();
        users
            .ensure_username_available(&input.username)
            .await
            .extend()?;

        let password_hash = hash_password(&input.password)
            .map_err(DomainError::from)
            .extend()?;
        let user = users.create(input.username, password_hash).await.extend()?;

        tracing::info!(user_id = %user.id, "user signed up");

        Ok(UserSignUpPayload {
            record_id: user.id,
            record: user,
        })
    }
}

/// Flattens validator output into one `field: message` line per failure
fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string())
                )
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_includes_field_and_text() {
        let input = UserSignUpInput {
            username: "ab".to_string(),
            password: "SecureP@ss123".to_string(),
        };

        let errors = input.validate().expect_err("short username should fail");
        let message = validation_message(&errors);

        assert!(message.contains("username"));
        assert!(message.contains("3 to 32"));
    }

    #[test]
    fn test_username_length_bounds() {
        let ok = UserSignUpInput {
            username: "abc".to_string(),
            password: "SecureP@ss123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = UserSignUpInput {
            username: "a".repeat(33),
            password: "SecureP@ss123".to_string(),
        };
        assert!(too_long.validate().is_err());
    }
}
