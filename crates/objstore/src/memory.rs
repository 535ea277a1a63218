//! In-memory bucket used by tests and dry runs.

use crate::error::{ObjectStoreError, Result};
use crate::{ListPage, ObjectStore};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Keys are listed in lexical order, `page_size` per page.
pub struct MemoryStore {
    name: String,
    objects: BTreeMap<String, Vec<u8>>,
    page_size: usize,
    failures: RefCell<Vec<ObjectStoreError>>,
    fetched: RefCell<Vec<String>>,
    pages_listed: RefCell<usize>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: BTreeMap::new(),
            page_size: 1000,
            failures: RefCell::new(Vec::new()),
            fetched: RefCell::new(Vec::new()),
            pages_listed: RefCell::new(0),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_object(mut self, key: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(key.into(), payload.into());
        self
    }

    /// Queue an error returned by the next listing or fetch call.
    pub fn fail_next(&self, err: ObjectStoreError) {
        self.failures.borrow_mut().push(err);
    }

    /// Keys fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub fn pages_listed(&self) -> usize {
        *self.pages_listed.borrow()
    }

    fn take_failure(&self) -> Result<()> {
        let mut failures = self.failures.borrow_mut();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.remove(0))
        }
    }
}

impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_page(&self, continuation: Option<&str>) -> Result<ListPage> {
        self.take_failure()?;
        *self.pages_listed.borrow_mut() += 1;

        let start = match continuation {
            Some(token) => token.parse::<usize>().map_err(|_| {
                ObjectStoreError::Configuration(format!("bad continuation token {token}"))
            })?,
            None => 0,
        };
        let keys: Vec<String> = self
            .objects
            .keys()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let end = start + keys.len();
        let next = (end < self.objects.len()).then(|| end.to_string());
        Ok(ListPage { keys, next })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.take_failure()?;
        self.fetched.borrow_mut().push(key.to_string());
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound {
                key: key.to_string(),
            })
    }
}
