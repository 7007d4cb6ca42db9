/// Task collection access
///
/// All read and write paths require a caller scope. Filter, sort, and patch
/// documents are built by free functions so their shape can be tested
/// without a running server.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;

use async_graphql::MaybeUndefined;

use crate::auth::identity::Principal;
use crate::error::{DomainError, DomainResult};
use crate::models::task::{Task, TaskAddInput, TaskEditInput, TaskFilter, TaskSort};

/// Access to the `tasks` collection
#[derive(Debug, Clone)]
pub struct TaskStore {
    collection: Collection<Task>,
}

impl TaskStore {
    pub(crate) fn new(collection: Collection<Task>) -> Self {
        Self { collection }
    }

    /// Narrows the store to the given caller's records
    pub fn scoped(&self, principal: &Principal) -> ScopedTaskStore {
        ScopedTaskStore {
            collection: self.collection.clone(),
            owner_id: principal.user_id,
        }
    }
}

/// Task access narrowed to one owner
///
/// The owner predicate is conjoined into every filter, so a forgotten check
/// in a resolver cannot leak another user's tasks. "Not yours" and "does not
/// exist" are indistinguishable by design.
#[derive(Debug, Clone)]
pub struct ScopedTaskStore {
    collection: Collection<Task>,
    owner_id: ObjectId,
}

impl ScopedTaskStore {
    /// Creates a task owned by the scope's caller
    ///
    /// `projectId` is stored as given without a referential check; a
    /// dangling reference resolves to `null` at read time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    pub async fn create(&self, input: TaskAddInput) -> DomainResult<Task> {
        let now = bson::DateTime::now().to_chrono();
        let task = Task {
            id: ObjectId::new(),
            title: input.title,
            is_completed: input.is_completed,
            is_removed: input.is_removed,
            due_date: input.due_date,
            project_id: input.project_id,
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.collection.insert_one(&task, None).await?;
        Ok(task)
    }

    /// Fetches one of the caller's tasks by id
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the task does not exist or belongs
    /// to someone else.
    pub async fn get(&self, id: ObjectId) -> DomainResult<Task> {
        self.collection
            .find_one(doc! { "_id": id, "ownerId": self.owner_id }, None)
            .await?
            .ok_or_else(|| DomainError::NotFound("Task not found".to_string()))
    }

    /// Lists the caller's tasks, optionally filtered and sorted
    ///
    /// Present filter fields are conjoined. A due-date filter matches any
    /// task whose due date falls within that calendar day (UTC). Without a
    /// sort the storage's natural order is preserved.
    pub async fn list(
        &self,
        filter: Option<TaskFilter>,
        sort: Option<TaskSort>,
    ) -> DomainResult<Vec<Task>> {
        let filter = task_filter_document(self.owner_id, filter.as_ref());
        let options = sort.map(|sort| {
            FindOptions::builder()
                .sort(task_sort_document(sort))
                .build()
        });
        let tasks = self
            .collection
            .find(filter, options)
            .await?
            .try_collect()
            .await?;
        Ok(tasks)
    }

    /// Applies a merge patch to one of the caller's tasks
    ///
    /// Only fields present in the patch change; an explicit `null` due date
    /// clears the stored value. Returns the post-update record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the task does not exist or belongs
    /// to someone else.
    pub async fn update(&self, patch: TaskEditInput) -> DomainResult<Task> {
        self.apply_patch(patch)
            .await?
            .ok_or_else(|| DomainError::NotFound("Task not found".to_string()))
    }

    /// Applies a batch of merge patches, tolerating missing targets
    ///
    /// Patches whose target does not exist (or is not the caller's) are
    /// skipped; the returned records are the successfully updated tasks in
    /// patch order. Storage failures abort the batch and propagate; updates
    /// applied before the failure stand, as the batch is not transactional.
    pub async fn update_many(&self, patches: Vec<TaskEditInput>) -> DomainResult<Vec<Task>> {
        let mut updated = Vec::with_capacity(patches.len());
        for patch in patches {
            if let Some(task) = self.apply_patch(patch).await? {
                updated.push(task);
            }
        }
        Ok(updated)
    }

    /// Soft-removes one of the caller's tasks
    ///
    /// Sets `isRemoved` and bumps `updatedAt`. Idempotent: removing an
    /// already-removed task succeeds and returns the record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the task does not exist or belongs
    /// to someone else.
    pub async fn soft_remove(&self, id: ObjectId) -> DomainResult<Task> {
        let now = bson::DateTime::now();
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(
                doc! { "_id": id, "ownerId": self.owner_id },
                doc! { "$set": { "isRemoved": true, "updatedAt": now } },
                options,
            )
            .await?
            .ok_or_else(|| DomainError::NotFound("Task not found".to_string()))
    }

    /// Physically deletes one of the caller's tasks
    ///
    /// Returns the record as it was before deletion.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the task does not exist or belongs
    /// to someone else.
    pub async fn delete(&self, id: ObjectId) -> DomainResult<Task> {
        self.collection
            .find_one_and_delete(doc! { "_id": id, "ownerId": self.owner_id }, None)
            .await?
            .ok_or_else(|| DomainError::NotFound("Task not found".to_string()))
    }

    /// Single-patch primitive shared by `update` and `update_many`
    ///
    /// `Ok(None)` means the target was missing or not the caller's.
    async fn apply_patch(&self, patch: TaskEditInput) -> DomainResult<Option<Task>> {
        let now = bson::DateTime::now().to_chrono();
        let update = task_update_document(&patch, now);
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let task = self
            .collection
            .find_one_and_update(
                doc! { "_id": patch.id, "ownerId": self.owner_id },
                update,
                options,
            )
            .await?;
        Ok(task)
    }
}

/// Builds the find filter for a task listing
///
/// Starts from the owner predicate and conjoins each present filter field.
/// The due-date field matches the half-open day interval `[00:00, +1 day)`.
pub fn task_filter_document(owner_id: ObjectId, filter: Option<&TaskFilter>) -> Document {
    let mut document = doc! { "ownerId": owner_id };
    let Some(filter) = filter else {
        return document;
    };

    if let Some(is_completed) = filter.is_completed {
        document.insert("isCompleted", is_completed);
    }
    if let Some(is_removed) = filter.is_removed {
        document.insert("isRemoved", is_removed);
    }
    if let Some(project_id) = filter.project_id {
        document.insert("projectId", project_id);
    }
    if let Some(due_date) = filter.due_date {
        let (start, end) = due_date_bounds(due_date);
        document.insert(
            "dueDate",
            doc! {
                "$gte": bson::DateTime::from_chrono(start),
                "$lt": bson::DateTime::from_chrono(end),
            },
        );
    }

    document
}

/// Builds the sort document for a task listing
pub fn task_sort_document(sort: TaskSort) -> Document {
    match sort {
        TaskSort::DueDateAsc => doc! { "dueDate": 1 },
        TaskSort::DueDateDesc => doc! { "dueDate": -1 },
    }
}

/// Builds the `$set` document for a task patch
///
/// Absent fields are skipped, an explicit `null` due date is written as
/// BSON null, and `updatedAt` is always bumped. The target id never appears
/// in the update.
pub fn task_update_document(patch: &TaskEditInput, now: DateTime<Utc>) -> Document {
    let mut set = Document::new();

    if let Some(title) = &patch.title {
        set.insert("title", title);
    }
    if let Some(is_completed) = patch.is_completed {
        set.insert("isCompleted", is_completed);
    }
    if let Some(is_removed) = patch.is_removed {
        set.insert("isRemoved", is_removed);
    }
    if let Some(project_id) = patch.project_id {
        set.insert("projectId", project_id);
    }
    match &patch.due_date {
        MaybeUndefined::Undefined => {}
        MaybeUndefined::Null => {
            set.insert("dueDate", Bson::Null);
        }
        MaybeUndefined::Value(due_date) => {
            set.insert("dueDate", bson::DateTime::from_chrono(*due_date));
        }
    }
    set.insert("updatedAt", bson::DateTime::from_chrono(now));

    doc! { "$set": set }
}

/// UTC bounds of one calendar day as a half-open interval
pub fn due_date_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn edit_input(id: ObjectId) -> TaskEditInput {
        TaskEditInput {
            id,
            title: None,
            is_completed: None,
            is_removed: None,
            due_date: MaybeUndefined::Undefined,
            project_id: None,
        }
    }

    #[test]
    fn test_filter_without_fields_is_owner_only() {
        let owner_id = ObjectId::new();
        let document = task_filter_document(owner_id, None);

        assert_eq!(document.len(), 1);
        assert_eq!(document.get_object_id("ownerId").unwrap(), owner_id);
    }

    #[test]
    fn test_filter_conjoins_present_fields() {
        let owner_id = ObjectId::new();
        let project_id = ObjectId::new();
        let filter = TaskFilter {
            is_completed: Some(true),
            is_removed: Some(false),
            due_date: None,
            project_id: Some(project_id),
        };

        let document = task_filter_document(owner_id, Some(&filter));

        assert_eq!(document.get_object_id("ownerId").unwrap(), owner_id);
        assert_eq!(document.get_bool("isCompleted").unwrap(), true);
        assert_eq!(document.get_bool("isRemoved").unwrap(), false);
        assert_eq!(document.get_object_id("projectId").unwrap(), project_id);
    }

    #[test]
    fn test_due_date_filter_is_half_open_day_interval() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let filter = TaskFilter {
            due_date: Some(date),
            ..TaskFilter::default()
        };

        let document = task_filter_document(ObjectId::new(), Some(&filter));
        let range = document.get_document("dueDate").unwrap();

        let start = range.get_datetime("$gte").unwrap().to_chrono();
        let end = range.get_datetime("$lt").unwrap().to_chrono();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_due_date_bounds_contain_late_evening() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = due_date_bounds(date);

        let late_evening = Utc.with_ymd_and_hms(2024, 3, 15, 23, 0, 0).unwrap();
        let next_midnight = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();

        assert!(late_evening >= start && late_evening < end);
        assert!(next_midnight >= end, "midnight of the next day is excluded");
    }

    #[test]
    fn test_sort_documents() {
        assert_eq!(
            task_sort_document(TaskSort::DueDateAsc),
            doc! { "dueDate": 1 }
        );
        assert_eq!(
            task_sort_document(TaskSort::DueDateDesc),
            doc! { "dueDate": -1 }
        );
    }

    #[test]
    fn test_update_document_skips_absent_fields() {
        let patch = edit_input(ObjectId::new());
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let update = task_update_document(&patch, now);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.len(), 1);
        assert!(set.get_datetime("updatedAt").is_ok());
    }

    #[test]
    fn test_update_document_sets_present_fields() {
        let project_id = ObjectId::new();
        let due = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let patch = TaskEditInput {
            title: Some("Renamed".to_string()),
            is_completed: Some(true),
            project_id: Some(project_id),
            due_date: MaybeUndefined::Value(due),
            ..edit_input(ObjectId::new())
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let update = task_update_document(&patch, now);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("title").unwrap(), "Renamed");
        assert_eq!(set.get_bool("isCompleted").unwrap(), true);
        assert_eq!(set.get_object_id("projectId").unwrap(), project_id);
        assert_eq!(set.get_datetime("dueDate").unwrap().to_chrono(), due);
        assert!(!set.contains_key("_id"));
        assert!(!set.contains_key("id"));
    }

    #[test]
    fn test_update_document_null_clears_due_date() {
        let patch = TaskEditInput {
            due_date: MaybeUndefined::Null,
            ..edit_input(ObjectId::new())
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let update = task_update_document(&patch, now);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get("dueDate"), Some(&Bson::Null));
    }
}
