/// Integration tests for request-scoped relation batching
///
/// These tests drive the dataloader with a synthetic in-memory loader, so
/// no database is required. They pin down the batching contract the GraphQL
/// layer relies on: concurrent lookups coalesce into one deduplicated batch,
/// results are memoized for the loader's lifetime, and a fresh loader starts
/// cold.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use futures::future::join_all;

use taskgraph_shared::error::DomainError;

/// Key that the loader pretends not to find
const MISSING_KEY: u64 = 404;

/// Loader that records every batch it is asked to fetch
#[derive(Clone)]
struct CountingLoader {
    calls: Arc<AtomicUsize>,
    batches: Arc<Mutex<Vec<Vec<u64>>>>,
}

impl CountingLoader {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Loader<u64> for CountingLoader {
    type Value = String;
    type Error = DomainError;

    async fn load(&self, keys: &[u64]) -> Result<HashMap<u64, String>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches
            .lock()
            .expect("batch log poisoned")
            .push(keys.to_vec());
        Ok(keys
            .iter()
            .filter(|key| **key != MISSING_KEY)
            .map(|key| (*key, format!("record-{key}")))
            .collect())
    }
}

fn request_loader(loader: CountingLoader) -> DataLoader<CountingLoader, HashMapCache> {
    DataLoader::with_cache(loader, tokio::spawn, HashMapCache::default())
}

#[tokio::test]
async fn test_concurrent_lookups_coalesce_into_one_batch() {
    let counting = CountingLoader::new();
    let loader = request_loader(counting.clone());

    // Ten concurrent lookups over three distinct keys, as a listing with
    // repeated parent references would issue
    let keys = [1u64, 2, 3, 1, 2, 3, 1, 2, 3, 1];
    let results = join_all(keys.iter().map(|key| loader.load_one(*key))).await;

    for (key, result) in keys.iter().zip(results) {
        let value = result.expect("lookup should succeed");
        assert_eq!(value, Some(format!("record-{key}")));
    }

    assert_eq!(
        counting.call_count(),
        1,
        "all lookups should share one batch"
    );

    let batches = counting.batches.lock().expect("batch log poisoned");
    let mut batch = batches[0].clone();
    batch.sort_unstable();
    assert_eq!(batch, vec![1, 2, 3], "batch keys should be deduplicated");
}

#[tokio::test]
async fn test_results_are_memoized_for_the_loader_lifetime() {
    let counting = CountingLoader::new();
    let loader = request_loader(counting.clone());

    let first = loader.load_one(7).await.expect("lookup should succeed");
    assert_eq!(first, Some("record-7".to_string()));

    let second = loader.load_one(7).await.expect("lookup should succeed");
    assert_eq!(second, first);

    assert_eq!(
        counting.call_count(),
        1,
        "repeat lookup should be served from the cache"
    );
}

#[tokio::test]
async fn test_fresh_loader_starts_cold() {
    let counting = CountingLoader::new();

    let loader = request_loader(counting.clone());
    loader.load_one(7).await.expect("lookup should succeed");

    let fresh = request_loader(counting.clone());
    fresh.load_one(7).await.expect("lookup should succeed");

    assert_eq!(
        counting.call_count(),
        2,
        "a new loader must not see another loader's cache"
    );
}

#[tokio::test]
async fn test_missing_key_resolves_to_none() {
    let counting = CountingLoader::new();
    let loader = request_loader(counting);

    let result = loader
        .load_one(MISSING_KEY)
        .await
        .expect("lookup should succeed");
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_missing_key_does_not_fail_the_batch() {
    let counting = CountingLoader::new();
    let loader = request_loader(counting.clone());

    let keys = [1u64, MISSING_KEY, 2];
    let results = join_all(keys.iter().map(|key| loader.load_one(*key))).await;
    let values: Vec<Option<String>> = results
        .into_iter()
        .map(|result| result.expect("lookup should succeed"))
        .collect();

    assert_eq!(values[0], Some("record-1".to_string()));
    assert_eq!(values[1], None);
    assert_eq!(values[2], Some("record-2".to_string()));
    assert_eq!(counting.call_count(), 1);
}
