/// GraphQL schema composition
///
/// The API surface is assembled here at startup: per-resource query objects
/// are merged into one query root, and the mutation root exposes one
/// namespace object per resource (`auth`, `user`, `project`, `task`).
/// Nothing registers itself anywhere; adding a resource means adding its
/// object to these roots.
///
/// The storage handle is installed as schema-global data. Per-request data
/// (identity, session, relation loaders) is attached by the handler in
/// [`crate::app`].

pub mod auth;
pub mod projects;
pub mod tasks;
pub mod users;

use async_graphql::{EmptySubscription, MergedObject, Object, Schema};

use taskgraph_shared::store::Store;

use auth::AuthMutation;
use projects::{ProjectMutation, ProjectQuery};
use tasks::{TaskMutation, TaskQuery};
use users::{UserMutation, UserQuery};

/// Combined query root
#[derive(MergedObject, Default)]
#[graphql(name = "Query")]
pub struct QueryRoot(UserQuery, ProjectQuery, TaskQuery);

/// Mutation root exposing one namespace object per resource
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// Authentication operations
    async fn auth(&self) -> AuthMutation {
        AuthMutation
    }

    /// User account operations
    async fn user(&self) -> UserMutation {
        UserMutation
    }

    /// Project operations
    async fn project(&self) -> ProjectMutation {
        ProjectMutation
    }

    /// Task operations
    async fn task(&self) -> TaskMutation {
        TaskMutation
    }
}

/// Schema type served by the API
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema with the storage handle installed as global data
pub fn build_schema(store: Store) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}
