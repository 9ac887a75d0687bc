use crate::infra::store::{CounterStore, StoreError};

/// Get-or-initialize-then-increment over a single named counter. All state
/// lives in the store; this type only sequences the calls.
pub(super) struct CounterService<S> {
    store: S,
}

impl<S: CounterStore> CounterService<S> {
    pub(super) fn new(store: S) -> Self {
        Self { store }
    }

    /// Ensures the counter exists, then increments it. The existence check
    /// covers stores whose increment does not auto-create missing keys.
    pub(super) async fn record_visit(&self, key: &str) -> Result<(), StoreError> {
        match self.store.get(key).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => {
                // Two concurrent first visits can both land here. The
                // conditional write lets at most one of them create the key;
                // the loser gets `false`, and both increments below still
                // count. Kept non-atomic on purpose.
                self.store.set_if_absent(key, 0).await?;
            }
            Err(err) => return Err(err),
        }

        self.store.increment(key).await?;

        Ok(())
    }

    /// Current value of the counter. `NotFound` until the first visit.
    pub(super) async fn read_visits(&self, key: &str) -> Result<i64, StoreError> {
        self.store.get(key).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::infra::store::{testing::MemoryStore, CounterStore, StoreError};

    use super::CounterService;

    const KEY: &str = "visits";

    #[tokio::test]
    async fn reading_before_any_visit_is_not_found() {
        let service = CounterService::new(MemoryStore::new());

        assert!(matches!(service.read_visits(KEY).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn first_visit_initializes_and_counts() {
        let service = CounterService::new(MemoryStore::new());

        service.record_visit(KEY).await.unwrap();

        assert_eq!(service.read_visits(KEY).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn visits_accumulate() {
        let service = CounterService::new(MemoryStore::new());

        for _ in 0..3 {
            service.record_visit(KEY).await.unwrap();
        }

        assert_eq!(service.read_visits(KEY).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn losing_the_initialization_race_is_benign() {
        let store = MemoryStore::new();

        // The key appears between this caller's NotFound and its conditional
        // write, as if a concurrent visit initialized it first.
        assert!(store.set_if_absent(KEY, 0).await.unwrap());
        assert!(!store.set_if_absent(KEY, 0).await.unwrap());

        let service = CounterService::new(store);
        service.record_visit(KEY).await.unwrap();

        assert_eq!(service.read_visits(KEY).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_visits_are_all_counted() {
        const VISITORS: i64 = 32;

        let service = Arc::new(CounterService::new(MemoryStore::new()));

        let mut tasks = Vec::new();
        for _ in 0..VISITORS {
            let service = Arc::clone(&service);
            tasks.push(tokio::spawn(async move { service.record_visit(KEY).await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(service.read_visits(KEY).await.unwrap(), VISITORS);
    }

    #[tokio::test]
    async fn outage_fails_both_operations_without_state_change() {
        let store = MemoryStore::new();
        store.go_offline();

        let service = CounterService::new(store.clone());

        assert!(matches!(service.record_visit(KEY).await, Err(StoreError::Unavailable(_))));
        assert!(matches!(service.read_visits(KEY).await, Err(StoreError::Unavailable(_))));

        // Nothing was initialized while the store was down.
        store.restore();
        assert!(matches!(service.read_visits(KEY).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn corrupt_value_is_reported_not_garbled() {
        let store = MemoryStore::new();
        store.set_raw(KEY, "not-a-number");

        let service = CounterService::new(store);

        assert!(matches!(service.read_visits(KEY).await, Err(StoreError::Corrupt(_))));
        // Recording propagates the corruption instead of incrementing.
        assert!(matches!(service.record_visit(KEY).await, Err(StoreError::Corrupt(_))));
    }
}
