/// Authentication mutations
///
/// Login verifies credentials against the stored Argon2 digest and writes
/// the user's id and roles into the cookie session; logout destroys the
/// session. Everything else reads the session through [`Identity`] built in
/// the request handler.
///
/// [`Identity`]: taskgraph_shared::auth::identity::Identity

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result, ResultExt, SimpleObject};
use mongodb::bson::oid::ObjectId;
use tower_sessions::Session;

use taskgraph_shared::auth::identity::SessionUser;
use taskgraph_shared::auth::password::verify_password;
use taskgraph_shared::error::DomainError;
use taskgraph_shared::models::user::User;
use taskgraph_shared::store::Store;

/// Session key under which the authenticated user is stored
pub const SESSION_USER_KEY: &str = "user";

/// Login request
#[derive(Debug, InputObject)]
pub struct AuthLoginInput {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Login result
#[derive(SimpleObject)]
pub struct AuthLoginPayload {
    /// The authenticated user
    pub record: User,

    /// Id of the authenticated user
    pub record_id: ObjectId,
}

/// Logout result
#[derive(SimpleObject)]
pub struct AuthLogoutPayload {
    /// Whether the session was cleared
    pub success: bool,
}

/// `auth` mutation namespace
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Verifies credentials and establishes a session
    ///
    /// Unknown username and wrong password produce the same error, so the
    /// response does not reveal whether an account exists.
    async fn login(&self, ctx: &Context<'_>, input: AuthLoginInput) -> Result<AuthLoginPayload> {
        let store = ctx.data::<Store>()?;

        let user = store
            .users()
            .find_by_username(&input.username)
            .await
            .extend()?
            .ok_or_else(invalid_credentials)
            .extend()?;

        let valid = verify_password(&input.password, &user.password_hash)
            .map_err(DomainError::from)
            .extend()?;
        if !valid {
            tracing::warn!(username = %input.username, "login rejected");
            return Err(invalid_credentials().extend());
        }

        let session = ctx.data::<Session>()?;
        session
            .insert(
                SESSION_USER_KEY,
                SessionUser {
                    id: user.id,
                    roles: user.roles.clone(),
                },
            )
            .await
            .map_err(|e| DomainError::Internal(format!("session write failed: {e}")))
            .extend()?;

        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(AuthLoginPayload {
            record_id: user.id,
            record: user,
        })
    }

    /// Ends the current session
    ///
    /// Succeeds whether or not the caller was logged in.
    async fn logout(&self, ctx: &Context<'_>) -> Result<AuthLogoutPayload> {
        let session = ctx.data::<Session>()?;
        session
            .flush()
            .await
            .map_err(|e| DomainError::Internal(format!("session clear failed: {e}")))
            .extend()?;

        Ok(AuthLogoutPayload { success: true })
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::Unauthenticated("Invalid username or password".to_string())
}
