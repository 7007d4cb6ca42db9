/// User collection access

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::Collection;

use crate::auth::identity::Role;
use crate::error::{DomainError, DomainResult};
use crate::models::user::User;

/// Access to the `users` collection
///
/// Deliberately unscoped: user records have no owner, and the resolver-layer
/// guards (self-or-admin, admin-only) decide who may read which record.
#[derive(Debug, Clone)]
pub struct UserStore {
    collection: Collection<User>,
}

impl UserStore {
    pub(crate) fn new(collection: Collection<User>) -> Self {
        Self { collection }
    }

    /// Creates a user with the `User` role
    ///
    /// The caller is responsible for hashing the password and checking
    /// username availability first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    pub async fn create(&self, username: String, password_hash: String) -> DomainResult<User> {
        let user = User {
            id: ObjectId::new(),
            username,
            password_hash,
            roles: vec![Role::User],
            created_at: bson::DateTime::now().to_chrono(),
        };
        self.collection.insert_one(&user, None).await?;
        Ok(user)
    }

    /// Fetches a user by id
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no such user exists.
    pub async fn get(&self, id: ObjectId) -> DomainResult<User> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
    }

    /// Fetches a user by username, if one exists
    pub async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username }, None)
            .await?;
        Ok(user)
    }

    /// Fails with `Conflict` if the username is already taken
    ///
    /// Check-then-insert without a transaction, so two concurrent sign-ups of
    /// the same username can race past this check. A unique index on
    /// `username` is the backstop.
    pub async fn ensure_username_available(&self, username: &str) -> DomainResult<()> {
        match self.find_by_username(username).await? {
            Some(_) => Err(DomainError::Conflict("Username already taken".to_string())),
            None => Ok(()),
        }
    }

    /// Lists all users
    pub async fn list(&self) -> DomainResult<Vec<User>> {
        let users = self
            .collection
            .find(doc! {}, None)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    /// Fetches all users whose id is in `ids` with a single query
    ///
    /// Missing ids are simply absent from the result; order is unspecified.
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = self
            .collection
            .find(doc! { "_id": { "$in": ids } }, None)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }
}
