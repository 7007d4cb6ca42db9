/// Project model and GraphQL input
///
/// A project is a named container exclusively owned by one user. Ownership is
/// discovered by querying projects filtered by `ownerId`; the user document
/// holds no back-reference collection.

use async_graphql::{ComplexObject, Context, InputObject, Result, ResultExt, SimpleObject};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::user::User;
use crate::store::loader::RelationLoaders;

/// Project document in the `projects` collection
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Project {
    /// Unique project id
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Display name
    pub name: String,

    /// Owning user; stamped at creation and never reassigned
    pub owner_id: ObjectId,

    /// When the project was created
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Project {
    /// Resolves the owning user through the request-scoped relation loader
    ///
    /// `None` if the reference dangles (the owner was removed from storage
    /// out-of-band).
    async fn owner(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loaders = ctx.data::<RelationLoaders>()?;
        loaders.users.load_one(self.owner_id).await.extend()
    }
}

/// Input for creating a project
#[derive(Debug, Clone, InputObject)]
pub struct ProjectAddInput {
    /// Display name for the new project
    pub name: String,
}
