/// Project collection access

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::Collection;

use crate::auth::identity::Principal;
use crate::error::{DomainError, DomainResult};
use crate::models::project::Project;

/// Access to the `projects` collection
///
/// Read and write paths require a caller scope; `scoped` is the only way to
/// get at them. The unscoped surface is limited to relation-loader lookups.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    collection: Collection<Project>,
}

impl ProjectStore {
    pub(crate) fn new(collection: Collection<Project>) -> Self {
        Self { collection }
    }

    /// Narrows the store to the given caller's records
    pub fn scoped(&self, principal: &Principal) -> ScopedProjectStore {
        ScopedProjectStore {
            collection: self.collection.clone(),
            owner_id: principal.user_id,
        }
    }

    /// Fetches all projects whose id is in `ids` with a single query
    ///
    /// Relation resolution only. Missing ids are absent from the result.
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> DomainResult<Vec<Project>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let projects = self
            .collection
            .find(doc! { "_id": { "$in": ids } }, None)
            .await?
            .try_collect()
            .await?;
        Ok(projects)
    }
}

/// Project access narrowed to one owner
///
/// Every filter this store issues conjoins the owner predicate, so records
/// of other users are structurally unreachable rather than filtered by
/// resolver discipline.
#[derive(Debug, Clone)]
pub struct ScopedProjectStore {
    collection: Collection<Project>,
    owner_id: ObjectId,
}

impl ScopedProjectStore {
    /// Creates a project owned by the scope's caller
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    pub async fn create(&self, name: String) -> DomainResult<Project> {
        let now = bson::DateTime::now().to_chrono();
        let project = Project {
            id: ObjectId::new(),
            name,
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.collection.insert_one(&project, None).await?;
        Ok(project)
    }

    /// Fetches one of the caller's projects by id
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the project does not exist or
    /// belongs to someone else; the two cases are indistinguishable.
    pub async fn get(&self, id: ObjectId) -> DomainResult<Project> {
        self.collection
            .find_one(doc! { "_id": id, "ownerId": self.owner_id }, None)
            .await?
            .ok_or_else(|| DomainError::NotFound("Project not found".to_string()))
    }

    /// Lists all of the caller's projects
    pub async fn list(&self) -> DomainResult<Vec<Project>> {
        let projects = self
            .collection
            .find(doc! { "ownerId": self.owner_id }, None)
            .await?
            .try_collect()
            .await?;
        Ok(projects)
    }
}
