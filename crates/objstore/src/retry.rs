use crate::config::RetryConfig;
use crate::error::{ObjectStoreError, Result};
use crate::{ListPage, ObjectStore};
use backon::BlockingRetryable;
use diagnostics::*;
use std::time::Duration;

/// Retries transient listing and fetch failures of the wrapped store.
pub struct Retrying<S> {
    inner: S,
    policy: RetryConfig,
}

impl<S: ObjectStore> Retrying<S> {
    pub fn new(inner: S, policy: RetryConfig) -> Self {
        Self { inner, policy }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn notify(op: &'static str, err: &ObjectStoreError, delay: Duration) {
        let error_str = err.to_string();
        let delay_ms = delay.as_millis() as u64;
        warn!("{op} failed, retrying in {delay_ms}ms: {error}", op: op, delay_ms: delay_ms, error: error_str);
    }
}

impl<S: ObjectStore> ObjectStore for Retrying<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn list_page(&self, continuation: Option<&str>) -> Result<ListPage> {
        (|| self.inner.list_page(continuation))
            .retry(self.policy.backoff())
            .sleep(std::thread::sleep)
            .when(ObjectStoreError::is_transient)
            .notify(|err, delay| Self::notify("list", err, delay))
            .call()
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (|| self.inner.get(key))
            .retry(self.policy.backoff())
            .sleep(std::thread::sleep)
            .when(ObjectStoreError::is_transient)
            .notify(|err, delay| Self::notify("get", err, delay))
            .call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn fast() -> RetryConfig {
        RetryConfig {
            max_times: 2,
            min_delay_ms: 1,
            max_delay_ms: 2,
        }
    }

    #[test]
    fn test_transient_failure_is_retried() {
        let store = MemoryStore::new("b").with_object("a.json", "{}");
        store.fail_next(ObjectStoreError::ListStatus {
            bucket: "b".to_string(),
            status: 503,
        });
        let retrying = Retrying::new(store, fast());

        let page = retrying.list_page(None).expect("retried");
        assert_eq!(page.keys, vec!["a.json".to_string()]);
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let store = MemoryStore::new("b").with_object("a.json", "{}");
        store.fail_next(ObjectStoreError::GetStatus {
            key: "a.json".to_string(),
            status: 403,
        });
        let retrying = Retrying::new(store, fast());

        let err = retrying.get("a.json").expect_err("403 is permanent");
        assert!(matches!(err, ObjectStoreError::GetStatus { status: 403, .. }));
        assert!(retrying.into_inner().fetched().is_empty());
    }

    #[test]
    fn test_retries_are_bounded() {
        let store = MemoryStore::new("b");
        for _ in 0..3 {
            store.fail_next(ObjectStoreError::ListStatus {
                bucket: "b".to_string(),
                status: 500,
            });
        }
        let retrying = Retrying::new(store, fast());

        assert!(retrying.list_page(None).is_err());
    }
}
