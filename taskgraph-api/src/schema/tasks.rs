/// Task queries and mutations
///
/// All operations require an authenticated caller and act only on the
/// caller's own tasks via the ownership-scoped store. `remove` soft-deletes
/// (the record stays queryable via the `isRemoved` filter); `delete` is the
/// physical removal and returns the final snapshot.

use async_graphql::{Context, Object, Result, ResultExt, SimpleObject};
use mongodb::bson::oid::ObjectId;

use taskgraph_shared::auth::authorization::require_authenticated;
use taskgraph_shared::auth::identity::Identity;
use taskgraph_shared::models::task::{Task, TaskAddInput, TaskEditInput, TaskFilter, TaskSort};
use taskgraph_shared::store::Store;

/// Task creation result
#[derive(SimpleObject)]
pub struct TaskAddPayload {
    /// The created task
    pub record: Task,

    /// Id of the created task
    pub record_id: ObjectId,
}

/// Batch edit result
///
/// The collections carry every successfully patched task, in patch order;
/// patches whose target was missing are simply absent. The singular fields
/// are populated only when exactly one task was updated.
#[derive(SimpleObject)]
pub struct TaskEditPayload {
    /// The updated task, when exactly one patch succeeded
    pub record: Option<Task>,

    /// Id of the updated task, when exactly one patch succeeded
    pub record_id: Option<ObjectId>,

    /// All successfully updated tasks
    pub record_collection: Vec<Task>,

    /// Ids of all successfully updated tasks
    pub record_id_collection: Vec<ObjectId>,
}

/// Soft-removal result
#[derive(SimpleObject)]
pub struct TaskRemovePayload {
    /// The task after the removal flag was set
    pub record: Task,

    /// Id of the removed task
    pub record_id: ObjectId,
}

/// Hard-deletion result
#[derive(SimpleObject)]
pub struct TaskDeletePayload {
    /// The task as it was before deletion
    pub record: Task,

    /// Id of the deleted task
    pub record_id: ObjectId,
}

/// `task` query fields
#[derive(Default)]
pub struct TaskQuery;

#[Object]
impl TaskQuery {
    /// Fetches one of the caller's tasks
    ///
    /// A task owned by someone else is reported as not found.
    async fn task(&self, ctx: &Context<'_>, id: ObjectId) -> Result<Task> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        store.tasks().scoped(principal).get(id).await.extend()
    }

    /// Lists the caller's tasks, optionally filtered and sorted
    async fn task_collection(
        &self,
        ctx: &Context<'_>,
        filter: Option<TaskFilter>,
        sort: Option<TaskSort>,
    ) -> Result<Vec<Task>> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        store
            .tasks()
            .scoped(principal)
            .list(filter, sort)
            .await
            .extend()
    }
}

/// `task` mutation namespace
pub struct TaskMutation;

#[Object]
impl TaskMutation {
    /// Creates a task owned by the caller
    ///
    /// The project reference is stored as given; it is not checked against
    /// the projects collection.
    async fn add(&self, ctx: &Context<'_>, input: TaskAddInput) -> Result<TaskAddPayload> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        let task = store
            .tasks()
            .scoped(principal)
            .create(input)
            .await
            .extend()?;

        Ok(TaskAddPayload {
            record_id: task.id,
            record: task,
        })
    }

    /// Applies a batch of merge patches to the caller's tasks
    ///
    /// A single patch object is accepted as a list of one. Patches whose
    /// target does not exist are skipped, not errors; callers read the
    /// returned collection to see which patches landed.
    async fn edit(&self, ctx: &Context<'_>, input: Vec<TaskEditInput>) -> Result<TaskEditPayload> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        let updated = store
            .tasks()
            .scoped(principal)
            .update_many(input)
            .await
            .extend()?;

        let single = if updated.len() == 1 {
            updated.first().cloned()
        } else {
            None
        };

        Ok(TaskEditPayload {
            record_id: single.as_ref().map(|task| task.id),
            record: single,
            record_id_collection: updated.iter().map(|task| task.id).collect(),
            record_collection: updated,
        })
    }

    /// Soft-removes one of the caller's tasks
    ///
    /// Idempotent: removing an already-removed task succeeds again.
    async fn remove(&self, ctx: &Context<'_>, id: ObjectId) -> Result<TaskRemovePayload> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        let task = store
            .tasks()
            .scoped(principal)
            .soft_remove(id)
            .await
            .extend()?;

        Ok(TaskRemovePayload {
            record_id: task.id,
            record: task,
        })
    }

    /// Physically deletes one of the caller's tasks
    async fn delete(&self, ctx: &Context<'_>, id: ObjectId) -> Result<TaskDeletePayload> {
        let identity = ctx.data::<Identity>()?;
        let principal = require_authenticated(identity).extend()?;

        let store = ctx.data::<Store>()?;
        let task = store.tasks().scoped(principal).delete(id).await.extend()?;

        Ok(TaskDeletePayload {
            record_id: task.id,
            record: task,
        })
    }
}
