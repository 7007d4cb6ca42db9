/// Task model, filter, sort, and GraphQL inputs
///
/// Tasks carry two removal notions: `isRemoved` is a soft-delete flag set by
/// `task.remove` (the record stays queryable via explicit filter), while
/// `task.delete` physically deletes the document.

use async_graphql::{
    ComplexObject, Context, Enum, InputObject, MaybeUndefined, Result, ResultExt, SimpleObject,
};
use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::project::Project;
use super::user::User;
use crate::store::loader::RelationLoaders;

/// Task document in the `tasks` collection
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct Task {
    /// Unique task id
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Short description of the work item
    pub title: String,

    /// Completion flag
    pub is_completed: bool,

    /// Soft-delete flag; removed tasks stay queryable via explicit filter
    pub is_removed: bool,

    /// Optional due date
    #[serde(
        with = "super::optional_chrono_datetime_as_bson_datetime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<DateTime<Utc>>,

    /// Project the task belongs to
    pub project_id: ObjectId,

    /// Owning user; stamped at creation and never reassigned
    pub owner_id: ObjectId,

    /// When the task was created
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Task {
    /// Resolves the parent project through the request-scoped relation loader
    ///
    /// `None` if the reference dangles.
    async fn project(&self, ctx: &Context<'_>) -> Result<Option<Project>> {
        let loaders = ctx.data::<RelationLoaders>()?;
        loaders.projects.load_one(self.project_id).await.extend()
    }

    /// Resolves the owning user through the request-scoped relation loader
    ///
    /// `None` if the reference dangles.
    async fn owner(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loaders = ctx.data::<RelationLoaders>()?;
        loaders.users.load_one(self.owner_id).await.extend()
    }
}

/// Input for creating a task
///
/// There is deliberately no `ownerId` field: ownership is stamped from the
/// authenticated caller and is never caller-suppliable.
#[derive(Debug, Clone, InputObject)]
pub struct TaskAddInput {
    /// Short description of the work item
    pub title: String,

    /// Project the task belongs to
    pub project_id: ObjectId,

    /// Completion flag
    #[graphql(default = false)]
    pub is_completed: bool,

    /// Soft-delete flag
    #[graphql(default = false)]
    pub is_removed: bool,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// One patch within a `task.edit` call
///
/// Merge semantics: only fields present in the patch are applied. The due
/// date distinguishes "absent" (leave unchanged) from an explicit `null`
/// (clear the stored value).
#[derive(Debug, Clone, InputObject)]
pub struct TaskEditInput {
    /// Target task id (matched together with the caller's ownership)
    pub id: ObjectId,

    /// New title
    pub title: Option<String>,

    /// New completion flag
    pub is_completed: Option<bool>,

    /// New soft-delete flag
    pub is_removed: Option<bool>,

    /// New due date; explicit `null` clears it
    pub due_date: MaybeUndefined<DateTime<Utc>>,

    /// Move the task to another project
    pub project_id: Option<ObjectId>,
}

/// Filter for `taskCollection`
///
/// Fields are optional and independently combinable; present fields are
/// conjoined (AND semantics). The ownership predicate is always applied on
/// top of this filter by the scoped store.
#[derive(Debug, Clone, Default, InputObject)]
pub struct TaskFilter {
    /// Match the completion flag
    pub is_completed: Option<bool>,

    /// Match the soft-delete flag
    pub is_removed: Option<bool>,

    /// Day-granularity match: any due date within that calendar day (UTC)
    pub due_date: Option<NaiveDate>,

    /// Match tasks of one project
    pub project_id: Option<ObjectId>,
}

/// Sort order for `taskCollection`
///
/// Unspecified sort preserves storage's natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum TaskSort {
    /// Earliest due date first
    DueDateAsc,

    /// Latest due date first
    DueDateDesc,
}
