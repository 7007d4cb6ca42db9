/// Request-scoped relation batching
///
/// Nested `owner` and `project` fields would issue one lookup per parent
/// record if resolved naively. The loaders here collect the ids requested
/// within one GraphQL request, deduplicate them, and fetch each batch with a
/// single `$in` query. Results are memoized for the request's lifetime, so
/// repeated references to the same id cost one fetch.
///
/// A [`RelationLoaders`] value is built per request and dropped with it;
/// nothing is cached across requests, so a stale read can never outlive the
/// request that produced it.

use std::collections::HashMap;

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use mongodb::bson::oid::ObjectId;

use crate::error::DomainError;
use crate::models::project::Project;
use crate::models::user::User;
use crate::store::projects::ProjectStore;
use crate::store::users::UserStore;
use crate::store::Store;

/// Batched id-to-user lookup
pub struct UserLoader {
    users: UserStore,
}

impl Loader<ObjectId> for UserLoader {
    type Value = User;
    type Error = DomainError;

    async fn load(&self, keys: &[ObjectId]) -> Result<HashMap<ObjectId, User>, Self::Error> {
        let users = self.users.find_by_ids(keys).await?;
        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }
}

/// Batched id-to-project lookup
pub struct ProjectLoader {
    projects: ProjectStore,
}

impl Loader<ObjectId> for ProjectLoader {
    type Value = Project;
    type Error = DomainError;

    async fn load(&self, keys: &[ObjectId]) -> Result<HashMap<ObjectId, Project>, Self::Error> {
        let projects = self.projects.find_by_ids(keys).await?;
        Ok(projects
            .into_iter()
            .map(|project| (project.id, project))
            .collect())
    }
}

/// Per-request loader set, stored in the GraphQL request data
///
/// Keys absent from storage resolve to `None` rather than an error, which is
/// what lets dangling references surface as `null` fields.
pub struct RelationLoaders {
    pub users: DataLoader<UserLoader, HashMapCache>,
    pub projects: DataLoader<ProjectLoader, HashMapCache>,
}

impl RelationLoaders {
    /// Builds a fresh loader set for one request
    pub fn for_request(store: &Store) -> Self {
        Self {
            users: DataLoader::with_cache(
                UserLoader {
                    users: store.users(),
                },
                tokio::spawn,
                HashMapCache::default(),
            ),
            projects: DataLoader::with_cache(
                ProjectLoader {
                    projects: store.projects(),
                },
                tokio::spawn,
                HashMapCache::default(),
            ),
        }
    }
}
