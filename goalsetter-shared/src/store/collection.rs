/// Generic in-memory document collection
///
/// A `Collection<T>` is an insertion-ordered table of records keyed by their
/// `id`, with optional unique secondary fields declared at construction.
///
/// # Concurrency
///
/// All state sits behind a single `parking_lot::RwLock`:
///
/// - `insert`, `update`, `delete` and `clear` hold the write lock for the
///   whole check-and-mutate sequence, so two inserts racing on the same
///   unique value cannot both succeed and an update is an atomic
///   read-merge-write.
/// - Lookups hold the read lock and return owned clones, so callers always
///   see complete records and never observe later mutations.
///
/// Critical sections do no I/O and never await.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use goalsetter_shared::store::clock::SystemClock;
/// use goalsetter_shared::store::collection::{Collection, Document, UniqueField};
/// use std::sync::Arc;
///
/// #[derive(Clone)]
/// struct Tag {
///     id: String,
///     label: String,
///     updated_at: DateTime<Utc>,
/// }
///
/// impl Document for Tag {
///     type Patch = String;
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn updated_at(&self) -> DateTime<Utc> {
///         self.updated_at
///     }
///
///     fn apply(&mut self, label: String, updated_at: DateTime<Utc>) {
///         self.label = label;
///         self.updated_at = updated_at;
///     }
/// }
///
/// fn label(tag: &Tag) -> &str {
///     &tag.label
/// }
///
/// let tags = Collection::new(
///     "tags",
///     vec![UniqueField { name: "label", key: label }],
///     Arc::new(SystemClock),
/// );
///
/// let now = Utc::now();
/// tags.insert(Tag { id: "a".into(), label: "rust".into(), updated_at: now }).unwrap();
/// assert!(tags.insert(Tag { id: "b".into(), label: "rust".into(), updated_at: now }).is_err());
/// ```

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::clock::{self, Clock};

/// A record that can live in a [`Collection`]
pub trait Document: Clone + Send + Sync {
    /// Partial update applied by [`Collection::update`]
    type Patch;

    /// Primary key; must never change once the record is stored
    fn id(&self) -> &str;

    /// Last modification time
    fn updated_at(&self) -> DateTime<Utc>;

    /// Merges `patch` into the record and sets its modification time
    fn apply(&mut self, patch: Self::Patch, updated_at: DateTime<Utc>);
}

/// A secondary field whose values must be distinct across the collection
pub struct UniqueField<T> {
    /// Field name, reported in [`CollectionError::DuplicateKey`]
    pub name: &'static str,

    /// Extracts the field value from a record
    pub key: fn(&T) -> &str,
}

/// Error type for collection mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// The id or a unique field collides with an existing record
    #[error("Duplicate key in {collection}: {field} = {value:?}")]
    DuplicateKey {
        collection: &'static str,
        field: &'static str,
        value: String,
    },
}

struct Table<T> {
    records: IndexMap<String, T>,

    /// One index per unique field (same order): field value -> record id
    indexes: Vec<HashMap<String, String>>,
}

/// Insertion-ordered in-memory table of `T`
pub struct Collection<T: Document> {
    name: &'static str,
    unique: Vec<UniqueField<T>>,
    clock: Arc<dyn Clock>,
    table: RwLock<Table<T>>,
}

impl<T: Document> Collection<T> {
    /// Creates an empty collection
    ///
    /// # Arguments
    ///
    /// * `name` - Collection name used in error messages
    /// * `unique` - Fields that must be distinct across records
    /// * `clock` - Time source for `updated_at` on updates
    pub fn new(name: &'static str, unique: Vec<UniqueField<T>>, clock: Arc<dyn Clock>) -> Self {
        let indexes = unique.iter().map(|_| HashMap::new()).collect();

        Self {
            name,
            unique,
            clock,
            table: RwLock::new(Table {
                records: IndexMap::new(),
                indexes,
            }),
        }
    }

    /// Inserts a record whose id was generated by the caller
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::DuplicateKey` if the id or any unique field
    /// is already taken. The collection is left unchanged in that case.
    pub fn insert(&self, record: T) -> Result<T, CollectionError> {
        let mut guard = self.table.write();
        let table = &mut *guard;

        if table.records.contains_key(record.id()) {
            return Err(self.duplicate("id", record.id()));
        }

        for (field, index) in self.unique.iter().zip(&table.indexes) {
            let value = (field.key)(&record);
            if index.contains_key(value) {
                return Err(self.duplicate(field.name, value));
            }
        }

        for (field, index) in self.unique.iter().zip(table.indexes.iter_mut()) {
            index.insert((field.key)(&record).to_string(), record.id().to_string());
        }
        table
            .records
            .insert(record.id().to_string(), record.clone());

        Ok(record)
    }

    /// Point lookup by id
    pub fn find_by_id(&self, id: &str) -> Option<T> {
        self.table.read().records.get(id).cloned()
    }

    /// First record, in insertion order, matching `predicate`
    pub fn find_one_by<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.table
            .read()
            .records
            .values()
            .find(|record| predicate(*record))
            .cloned()
    }

    /// Snapshot of every record matching `predicate`, in insertion order
    pub fn find_all_by<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.table
            .read()
            .records
            .values()
            .filter(|record| predicate(*record))
            .cloned()
            .collect()
    }

    /// Merges `patch` into the record with the given id
    ///
    /// The record keeps its position in insertion order. Its `updated_at` is
    /// always refreshed and strictly greater than before.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` if no record has this id
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::DuplicateKey` if the patch would give a
    /// unique field a value held by another record. Nothing is written then.
    pub fn update(&self, id: &str, patch: T::Patch) -> Result<Option<T>, CollectionError> {
        let mut guard = self.table.write();
        let table = &mut *guard;

        let current = match table.records.get(id) {
            Some(record) => record.clone(),
            None => return Ok(None),
        };

        let mut updated = current.clone();
        updated.apply(patch, clock::advance(self.clock.now(), current.updated_at()));

        for (field, index) in self.unique.iter().zip(&table.indexes) {
            let value = (field.key)(&updated);
            match index.get(value) {
                Some(owner) if owner != id => return Err(self.duplicate(field.name, value)),
                _ => {}
            }
        }

        for (field, index) in self.unique.iter().zip(table.indexes.iter_mut()) {
            let old = (field.key)(&current);
            let new = (field.key)(&updated);
            if old != new {
                index.remove(old);
                index.insert(new.to_string(), id.to_string());
            }
        }
        table.records.insert(id.to_string(), updated.clone());

        Ok(Some(updated))
    }

    /// Removes the record with the given id
    ///
    /// Returns `true` if a record was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut guard = self.table.write();
        let table = &mut *guard;

        match table.records.shift_remove(id) {
            Some(record) => {
                for (field, index) in self.unique.iter().zip(table.indexes.iter_mut()) {
                    index.remove((field.key)(&record));
                }
                true
            }
            None => false,
        }
    }

    /// Removes every record
    pub fn clear(&self) {
        let mut table = self.table.write();
        table.records.clear();
        for index in table.indexes.iter_mut() {
            index.clear();
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.table.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn duplicate(&self, field: &'static str, value: &str) -> CollectionError {
        CollectionError::DuplicateKey {
            collection: self.name,
            field,
            value: value.to_string(),
        }
    }
}
