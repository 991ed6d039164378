//! In-memory document store
//!
//! This module provides the persistence boundary for the application: typed
//! collections of documents keyed by UUID, with atomic single-document
//! read-modify-write and predicate scans standing in for secondary indexes.
//! Each request-level operation takes the collection lock once, so two
//! concurrent writers to the same document serialize at the store layer
//! (last write wins, no version check).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Result of a uniqueness-guarded update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    /// The document was mutated; carries the updated copy
    Updated(T),
    /// No document with the given key exists
    NotFound,
    /// Another document already matched the uniqueness predicate
    Conflict,
}

/// A named collection of documents keyed by UUID
///
/// Cloning a `Collection` yields another handle to the same underlying
/// documents, so a collection can be shared across request handlers.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    name: &'static str,
    docs: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone> Collection<T> {
    /// Create a new, empty collection
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a document by primary key
    pub fn get(&self, id: Uuid) -> StoreResult<Option<T>> {
        let docs = self.docs.read().map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(docs.get(&id).cloned())
    }

    /// Insert a document under the given primary key
    ///
    /// Overwrites any existing document with the same key; callers that
    /// need a unique secondary field use [`Collection::insert_unique`].
    pub fn insert(&self, id: Uuid, doc: T) -> StoreResult<()> {
        let mut docs = self.docs.write().map_err(|_| StoreError::Poisoned(self.name))?;
        docs.insert(id, doc);
        Ok(())
    }

    /// Insert a document unless another document already matches the
    /// uniqueness predicate
    ///
    /// The scan and the insert run under one write lock, so two
    /// concurrent inserts racing on the same unique field serialize
    /// here and exactly one of them wins. Returns `true` when the
    /// document was inserted, `false` on a uniqueness conflict.
    pub fn insert_unique<P>(&self, id: Uuid, doc: T, taken: P) -> StoreResult<bool>
    where
        P: Fn(&T) -> bool,
    {
        let mut docs = self.docs.write().map_err(|_| StoreError::Poisoned(self.name))?;
        if docs.values().any(|existing| taken(existing)) {
            return Ok(false);
        }
        docs.insert(id, doc);
        Ok(true)
    }

    /// Atomically read-modify-write a single document
    ///
    /// The closure runs under the collection's write lock, so no other
    /// reader or writer observes the intermediate state. Returns the
    /// updated document, or `None` when the key does not exist.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> StoreResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut docs = self.docs.write().map_err(|_| StoreError::Poisoned(self.name))?;
        match docs.get_mut(&id) {
            Some(doc) => {
                mutate(doc);
                Ok(Some(doc.clone()))
            }
            None => Ok(None),
        }
    }

    /// Read-modify-write guarded by a uniqueness predicate
    ///
    /// Like [`Collection::update`], but the mutation is skipped when any
    /// other document (the keyed one excluded) matches the predicate.
    /// Check and mutation run under one write lock.
    pub fn update_unique<F, P>(&self, id: Uuid, mutate: F, taken: P) -> StoreResult<UpdateOutcome<T>>
    where
        F: FnOnce(&mut T),
        P: Fn(&T) -> bool,
    {
        let mut docs = self.docs.write().map_err(|_| StoreError::Poisoned(self.name))?;
        if docs
            .iter()
            .any(|(other_id, existing)| *other_id != id && taken(existing))
        {
            return Ok(UpdateOutcome::Conflict);
        }
        match docs.get_mut(&id) {
            Some(doc) => {
                mutate(doc);
                Ok(UpdateOutcome::Updated(doc.clone()))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    /// Remove a document by primary key, returning it when it existed
    pub fn remove(&self, id: Uuid) -> StoreResult<Option<T>> {
        let mut docs = self.docs.write().map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(docs.remove(&id))
    }

    /// Collect all documents matching a predicate
    ///
    /// This is the secondary-index access path: callers filter on an
    /// indexed field (owner, email) and the store returns matching clones
    /// in unspecified order.
    pub fn scan<P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let docs = self.docs.read().map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(docs.values().filter(|doc| predicate(doc)).cloned().collect())
    }

    /// Find the first document matching a predicate
    pub fn find_one<P>(&self, predicate: P) -> StoreResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        let docs = self.docs.read().map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(docs.values().find(|doc| predicate(doc)).cloned())
    }

    /// Remove every document matching a predicate, returning the count
    pub fn remove_where<P>(&self, predicate: P) -> StoreResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut docs = self.docs.write().map_err(|_| StoreError::Poisoned(self.name))?;
        let before = docs.len();
        docs.retain(|_, doc| !predicate(doc));
        Ok(before - docs.len())
    }

    /// Number of documents currently in the collection
    pub fn len(&self) -> StoreResult<usize> {
        let docs = self.docs.read().map_err(|_| StoreError::Poisoned(self.name))?;
        Ok(docs.len())
    }

    /// Whether the collection holds no documents
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Doc {
        owner: u32,
        value: String,
    }

    fn doc(owner: u32, value: &str) -> Doc {
        Doc {
            owner,
            value: value.to_string(),
        }
    }

    #[test]
    fn get_returns_inserted_document() {
        let collection = Collection::new("docs");
        let id = Uuid::new_v4();
        collection.insert(id, doc(1, "a")).unwrap();

        assert_eq!(collection.get(id).unwrap(), Some(doc(1, "a")));
        assert_eq!(collection.get(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn update_is_applied_and_returned() {
        let collection = Collection::new("docs");
        let id = Uuid::new_v4();
        collection.insert(id, doc(1, "a")).unwrap();

        let updated = collection
            .update(id, |d| d.value = "b".to_string())
            .unwrap();
        assert_eq!(updated, Some(doc(1, "b")));
        assert_eq!(collection.get(id).unwrap(), Some(doc(1, "b")));
    }

    #[test]
    fn update_missing_key_is_none() {
        let collection: Collection<Doc> = Collection::new("docs");
        let updated = collection
            .update(Uuid::new_v4(), |d| d.value.clear())
            .unwrap();
        assert_eq!(updated, None);
    }

    #[test]
    fn insert_unique_rejects_matching_document() {
        let collection = Collection::new("docs");
        collection.insert(Uuid::new_v4(), doc(1, "a")).unwrap();

        let inserted = collection
            .insert_unique(Uuid::new_v4(), doc(2, "a"), |d| d.value == "a")
            .unwrap();
        assert!(!inserted);
        assert_eq!(collection.len().unwrap(), 1);

        let inserted = collection
            .insert_unique(Uuid::new_v4(), doc(2, "b"), |d| d.value == "b")
            .unwrap();
        assert!(inserted);
        assert_eq!(collection.len().unwrap(), 2);
    }

    #[test]
    fn update_unique_excludes_the_keyed_document() {
        let collection = Collection::new("docs");
        let id = Uuid::new_v4();
        collection.insert(id, doc(1, "a")).unwrap();
        collection.insert(Uuid::new_v4(), doc(2, "b")).unwrap();

        // Keeping the document's own value is not a conflict with itself.
        let outcome = collection
            .update_unique(id, |d| d.owner = 9, |d| d.value == "a")
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated(doc(9, "a")));

        // Taking another document's value is.
        let outcome = collection
            .update_unique(id, |d| d.value = "b".to_string(), |d| d.value == "b")
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Conflict);
        assert_eq!(collection.get(id).unwrap(), Some(doc(9, "a")));

        let outcome = collection
            .update_unique(Uuid::new_v4(), |d| d.value.clear(), |_| false)
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
    }

    #[test]
    fn scan_filters_by_predicate() {
        let collection = Collection::new("docs");
        collection.insert(Uuid::new_v4(), doc(1, "a")).unwrap();
        collection.insert(Uuid::new_v4(), doc(1, "b")).unwrap();
        collection.insert(Uuid::new_v4(), doc(2, "c")).unwrap();

        let owned = collection.scan(|d| d.owner == 1).unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|d| d.owner == 1));
    }

    #[test]
    fn remove_where_deletes_only_matches() {
        let collection = Collection::new("docs");
        collection.insert(Uuid::new_v4(), doc(1, "a")).unwrap();
        collection.insert(Uuid::new_v4(), doc(2, "b")).unwrap();
        collection.insert(Uuid::new_v4(), doc(1, "c")).unwrap();

        let removed = collection.remove_where(|d| d.owner == 1).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(collection.len().unwrap(), 1);
        assert!(collection.find_one(|d| d.owner == 1).unwrap().is_none());
    }
}
