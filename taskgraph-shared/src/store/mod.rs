/// MongoDB storage layer
///
/// [`Store`] owns a database handle plus typed collection handles and is the
/// single entry point to persistence. Project and task access goes through
/// ownership-scoped sub-stores obtained with `scoped(&Principal)`; user
/// access is unscoped because the authorization guards for user operations
/// live at the resolver layer.

pub mod loader;
pub mod projects;
pub mod tasks;
pub mod users;

use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};

use crate::error::DomainResult;
use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::user::User;

pub use projects::{ProjectStore, ScopedProjectStore};
pub use tasks::{ScopedTaskStore, TaskStore};
pub use users::UserStore;

/// Shared storage handle
///
/// Cheap to clone; all handles are reference counted.
#[derive(Debug, Clone)]
pub struct Store {
    database: Database,
    users: Collection<User>,
    projects: Collection<Project>,
    tasks: Collection<Task>,
}

impl Store {
    /// Creates a store over an existing database handle
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            users: database.collection("users"),
            projects: database.collection("projects"),
            tasks: database.collection("tasks"),
        }
    }

    /// Connects to MongoDB and returns a store over the named database
    ///
    /// # Arguments
    ///
    /// * `uri` - MongoDB connection string
    /// * `database` - Database name
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed.
    pub async fn connect(uri: &str, database: &str) -> DomainResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(&client.database(database)))
    }

    /// User collection access
    pub fn users(&self) -> UserStore {
        UserStore::new(self.users.clone())
    }

    /// Project collection access
    pub fn projects(&self) -> ProjectStore {
        ProjectStore::new(self.projects.clone())
    }

    /// Task collection access
    pub fn tasks(&self) -> TaskStore {
        TaskStore::new(self.tasks.clone())
    }

    /// Round-trips a ping command to verify connectivity
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable.
    pub async fn ping(&self) -> DomainResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
