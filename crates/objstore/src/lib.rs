//! Enumerate JSON objects stored in a bucket.
//!
//! [`json_objects`] walks a paginated listing lazily and yields the key and
//! payload of every object whose key ends in `.json`. Other keys are never
//! fetched. The walk starts over each time it is called.

pub mod config;
pub mod error;
pub mod memory;
pub mod retry;
pub mod s3_store;

pub use config::{RetryConfig, S3Config};
pub use error::{ObjectStoreError, Result};
pub use memory::MemoryStore;
pub use retry::Retrying;
pub use s3_store::S3Store;

use diagnostics::*;
use std::collections::VecDeque;

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Continuation token for the next page, `None` on the last page.
    pub next: Option<String>,
}

/// Paginated read access to a bucket.
pub trait ObjectStore {
    /// Bucket name, for messages.
    fn name(&self) -> &str;

    fn list_page(&self, continuation: Option<&str>) -> Result<ListPage>;

    fn get(&self, key: &str) -> Result<Vec<u8>>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_page(&self, continuation: Option<&str>) -> Result<ListPage> {
        (**self).list_page(continuation)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get(key)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_page(&self, continuation: Option<&str>) -> Result<ListPage> {
        (**self).list_page(continuation)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get(key)
    }
}

/// A fetched object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub payload: Vec<u8>,
}

impl RemoteObject {
    pub fn new(key: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }

    /// Last path component of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }

    /// The payload as UTF-8 text.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Parse the payload; `None` when it is not UTF-8 JSON.
    pub fn parse_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(self.text()?).ok()
    }
}

/// True when the key names a JSON file (ASCII case-insensitive).
pub fn is_json_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() >= 5 && bytes[bytes.len() - 5..].eq_ignore_ascii_case(b".json")
}

/// Start a fresh walk over the JSON objects in `store`.
pub fn json_objects<S: ObjectStore + ?Sized>(store: &S) -> JsonObjects<'_, S> {
    JsonObjects {
        store,
        pending: VecDeque::new(),
        next: None,
        listed_last_page: false,
        ignored: 0,
    }
}

/// Lazy iterator returned by [`json_objects`].
///
/// A listing or fetch error is yielded once and ends the walk.
pub struct JsonObjects<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    pending: VecDeque<String>,
    next: Option<String>,
    listed_last_page: bool,
    ignored: usize,
}

impl<S: ObjectStore + ?Sized> JsonObjects<'_, S> {
    /// Keys skipped so far because they are not `.json`.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    fn stop(&mut self) {
        self.pending.clear();
        self.listed_last_page = true;
    }
}

impl<S: ObjectStore + ?Sized> Iterator for JsonObjects<'_, S> {
    type Item = Result<RemoteObject>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                if !is_json_key(&key) {
                    debug!("Ignoring non-JSON object {key}", key: key.as_str());
                    self.ignored += 1;
                    continue;
                }
                debug!("Loading object {key}", key: key.as_str());
                return match self.store.get(&key) {
                    Ok(payload) => Some(Ok(RemoteObject { key, payload })),
                    Err(err) => {
                        self.stop();
                        Some(Err(err))
                    }
                };
            }

            if self.listed_last_page {
                return None;
            }

            match self.store.list_page(self.next.as_deref()) {
                Ok(page) => {
                    debug!("Listed {count} keys in bucket {bucket}", count: page.keys.len(), bucket: self.store.name());
                    self.next = page.next;
                    self.listed_last_page = self.next.is_none();
                    self.pending.extend(page.keys);
                }
                Err(err) => {
                    self.stop();
                    return Some(Err(err));
                }
            }
        }
    }
}
