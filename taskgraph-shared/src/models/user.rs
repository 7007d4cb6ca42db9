/// User account model
///
/// Users are created through sign-up and never deleted. The password hash
/// is stored under the `password` field for compatibility with the original
/// collection layout, and is skipped in the GraphQL projection.

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::auth::identity::Role;

/// User document in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user id
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Unique, case-sensitive username
    pub username: String,

    /// Argon2id password hash; never exposed through the API
    #[serde(rename = "password")]
    #[graphql(skip)]
    pub password_hash: String,

    /// Role tags; changed out-of-band and applied at the next login
    #[serde(default)]
    pub roles: Vec<Role>,

    /// When the account was created
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn sample_user() -> User {
        User {
            id: ObjectId::new(),
            username: "alice".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            roles: vec![Role::User],
            created_at: bson::DateTime::now().to_chrono(),
        }
    }

    #[test]
    fn test_user_document_layout() {
        let user = sample_user();
        let document = bson::to_document(&user).expect("serialize user");

        // Stored under the original collection field names
        assert!(document.get_object_id("_id").is_ok());
        assert_eq!(document.get_str("username").unwrap(), "alice");
        assert_eq!(document.get_str("password").unwrap(), "$argon2id$stub");
        assert!(document.get_datetime("createdAt").is_ok());
        assert!(!document.contains_key("passwordHash"));
    }

    #[test]
    fn test_user_roundtrip() {
        let user = sample_user();
        let document = bson::to_document(&user).expect("serialize user");
        let back: User = bson::from_document(document).expect("deserialize user");

        assert_eq!(back.id, user.id);
        assert_eq!(back.username, user.username);
        assert_eq!(back.roles, user.roles);
    }

    #[test]
    fn test_user_without_roles_field() {
        // Documents written before roles existed deserialize to an empty set
        let document = bson::doc! {
            "_id": ObjectId::new(),
            "username": "legacy",
            "password": "$argon2id$stub",
            "createdAt": bson::DateTime::now(),
        };

        let user: User = bson::from_document(document).expect("deserialize user");
        assert!(user.roles.is_empty());
    }
}
