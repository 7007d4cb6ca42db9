/// Common test utilities for integration tests
///
/// The schema under test is built over a storage client pointing at an
/// unreachable address with a very short server-selection timeout. An
/// operation rejected by a guard or validator returns its domain error
/// without ever touching storage; an operation that passes its guards runs
/// into the unreachable backend and surfaces the INTERNAL code. Guard
/// ordering is therefore observable without a database.

use async_graphql::Request;
use mongodb::options::ClientOptions;
use mongodb::Client;
use serde_json::Value;
use std::time::Duration;

use taskgraph_api::schema::{build_schema, AppSchema};
use taskgraph_shared::auth::identity::Identity;
use taskgraph_shared::store::loader::RelationLoaders;
use taskgraph_shared::store::Store;

/// Test context with a schema over unreachable storage
pub struct TestContext {
    pub schema: AppSchema,
    pub store: Store,
}

impl TestContext {
    /// Creates a new test context
    ///
    /// Port 9 is reserved (discard protocol), so nothing listens there; the
    /// short timeouts keep storage-reaching tests fast.
    pub async fn new() -> Self {
        let mut options = ClientOptions::parse("mongodb://127.0.0.1:9")
            .await
            .expect("Failed to parse test connection string");
        options.server_selection_timeout = Some(Duration::from_millis(200));
        options.connect_timeout = Some(Duration::from_millis(200));

        let client = Client::with_options(options).expect("Failed to build test client");
        let store = Store::new(&client.database("taskgraph_test"));

        TestContext {
            schema: build_schema(store.clone()),
            store,
        }
    }

    /// Executes one GraphQL operation with the given identity
    ///
    /// Fresh relation loaders are attached per call, mirroring what the
    /// HTTP handler does per request.
    pub async fn execute(&self, identity: Identity, query: &str) -> Value {
        let request = Request::new(query)
            .data(identity)
            .data(RelationLoaders::for_request(&self.store));
        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).expect("Failed to serialize response")
    }
}

/// Extracts the `code` extension of the first error in a response
pub fn error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"]
        .as_str()
        .unwrap_or("")
}
