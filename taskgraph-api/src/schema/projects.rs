/// Project queries and mutations
///
/// All operations require an authenticated caller and act only on the
/// caller's own projects via the ownership-scoped store.

use async_graphql::{Context, Object, Result, ResultExt, SimpleObject};
use mongodb::bson::oid::ObjectId;

use taskgraph_shared::auth::authorization::require_authenticated;
use taskgraph_shared::auth::identity::Identity;
use taskgraph_shared::models::project::{Project, ProjectAddInput};
use taskgraph_shared::store::Store;

/// Project creation result
#[derive(SimpleObject)]
pub struct ProjectAddPayload {
    /// The created project
    pub record: Project,

    /// Id of the created project
    pub record_id: ObjectId,
}

/// `project` query fields
#[derive(Default)]
pub struct ProjectQuery;

#[Object]
impl ProjectQuery {
    /// Fetches one of the caller's projects
    ///
    /// A project owned by someone else is reported as not found.
    async fn project(&self, ctx: &Context<'_>, id: ObjectId) -> Result<Project> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        store.projects().scoped(principal).get(id).await.extend()
    }

    /// Lists the caller's projects
    async fn project_collection(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        store.projects().scoped(principal).list().await.extend()
    }
}

/// `project` mutation namespace
pub struct ProjectMutation;

#[Object]
impl ProjectMutation {
    /// Creates a project owned by the caller
    async fn add(&self, ctx: &Context<'_>, input: ProjectAddInput) -> Result<ProjectAddPayload> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        let project = store
            .projects()
            .scoped(principal)
            .create(input.name)
            .await
            .extend()?;

        Ok(ProjectAddPayload {
            record_id: project.id,
            record: project,
        })
    }
}
