//! Read and write transactions over a store snapshot.

use std::collections::BTreeMap;
use std::sync::{Arc, MutexGuard, PoisonError};

use tracing::debug;

use super::Store;
use super::error::StoreError;
use super::table::Table;
use crate::model::{Resource, TypedRecord};
use crate::registry::KindRegistry;
use crate::types::ResourceKind;

pub(crate) type Tables = BTreeMap<ResourceKind, Arc<Table>>;

/// An immutable, versioned set of tables.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub(crate) tables: Tables,
    pub(crate) version: u64,
}

/// A consistent view of the store as of the moment it was opened.
///
/// Later commits publish new snapshots and never touch this one, so a
/// `ReadTxn` can be shared across threads and read without locking.
#[derive(Debug, Clone)]
pub struct ReadTxn {
    snapshot: Arc<Snapshot>,
    registry: Arc<KindRegistry>,
}

impl ReadTxn {
    pub(crate) fn new(snapshot: Arc<Snapshot>, registry: Arc<KindRegistry>) -> Self {
        Self { snapshot, registry }
    }

    /// Number of commits that preceded this snapshot.
    pub fn version(&self) -> u64 {
        self.snapshot.version
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    fn table(&self, kind: &ResourceKind) -> Result<&Table, StoreError> {
        self.snapshot
            .tables
            .get(kind)
            .map(Arc::as_ref)
            .ok_or_else(|| StoreError::UnknownKind(kind.clone()))
    }

    /// Every record of `kind` in FQN order.
    pub fn scan<'t>(
        &'t self,
        kind: &ResourceKind,
    ) -> Result<impl Iterator<Item = &'t Resource> + use<'t>, StoreError> {
        Ok(self.table(kind)?.iter())
    }

    /// Records of `kind` living in `namespace`, in FQN order.
    pub fn scan_namespace<'t>(
        &'t self,
        kind: &ResourceKind,
        namespace: &str,
    ) -> Result<impl Iterator<Item = &'t Resource> + use<'t>, StoreError> {
        Ok(self.table(kind)?.iter_namespace(namespace))
    }

    /// Point lookup. A missing FQN is `Ok(None)`.
    pub fn get(&self, kind: &ResourceKind, fqn: &str) -> Result<Option<&Resource>, StoreError> {
        Ok(self.table(kind)?.get(fqn))
    }

    /// Like [`ReadTxn::scan`], yielding the concrete record type. Records of
    /// another type cannot be stored in a kind's table, so nothing is
    /// silently skipped for the builtin kinds.
    pub fn scan_as<'t, T: TypedRecord + 't>(
        &'t self,
        kind: &ResourceKind,
    ) -> Result<impl Iterator<Item = &'t T> + use<'t, T>, StoreError> {
        Ok(self.scan(kind)?.filter_map(T::from_resource))
    }

    pub fn scan_namespace_as<'t, T: TypedRecord + 't>(
        &'t self,
        kind: &ResourceKind,
        namespace: &str,
    ) -> Result<impl Iterator<Item = &'t T> + use<'t, T>, StoreError> {
        Ok(self
            .scan_namespace(kind, namespace)?
            .filter_map(T::from_resource))
    }

    pub fn get_as<T: TypedRecord>(
        &self,
        kind: &ResourceKind,
        fqn: &str,
    ) -> Result<Option<&T>, StoreError> {
        Ok(self.get(kind, fqn)?.and_then(T::from_resource))
    }

    pub fn count(&self, kind: &ResourceKind) -> Result<usize, StoreError> {
        Ok(self.table(kind)?.len())
    }

    pub fn is_loaded(&self, kind: &ResourceKind) -> Result<bool, StoreError> {
        Ok(self.table(kind)?.is_loaded())
    }

    /// Namespaces holding at least one record of `kind`.
    pub fn namespaces(&self, kind: &ResourceKind) -> Result<Vec<&str>, StoreError> {
        Ok(self.table(kind)?.namespaces().collect())
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ResourceKind> {
        self.snapshot.tables.keys()
    }
}

/// A pending set of changes, published atomically by [`WriteTxn::commit`].
///
/// Tables are shared with the published snapshot until first written, then
/// copied. Holding a `WriteTxn` blocks other writers.
pub struct WriteTxn<'a> {
    store: &'a Store,
    _gate: MutexGuard<'a, ()>,
    tables: Tables,
    base_version: u64,
    inserted: usize,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn new(store: &'a Store, gate: MutexGuard<'a, ()>, base: &Snapshot) -> Self {
        Self {
            store,
            _gate: gate,
            tables: base.tables.clone(),
            base_version: base.version,
            inserted: 0,
        }
    }

    fn table_mut(&mut self, kind: &ResourceKind) -> Result<&mut Table, StoreError> {
        self.tables
            .get_mut(kind)
            .map(Arc::make_mut)
            .ok_or_else(|| StoreError::UnknownKind(kind.clone()))
    }

    /// Insert into the table of the record's own kind. Returns true when an
    /// existing record with the same FQN was replaced.
    pub fn insert(&mut self, resource: Resource) -> Result<bool, StoreError> {
        let kind = resource.kind();
        let replaced = self.table_mut(&kind)?.insert(resource);
        self.inserted += 1;
        Ok(replaced)
    }

    /// Insert into an explicit table, rejecting records of another kind.
    pub fn insert_into(&mut self, kind: &ResourceKind, resource: Resource) -> Result<bool, StoreError> {
        let record_kind = resource.kind();
        if &record_kind != kind {
            return Err(StoreError::KindMismatch {
                table: kind.clone(),
                record: record_kind,
            });
        }
        self.insert(resource)
    }

    pub fn get(&self, kind: &ResourceKind, fqn: &str) -> Result<Option<&Resource>, StoreError> {
        self.tables
            .get(kind)
            .map(|table| table.get(fqn))
            .ok_or_else(|| StoreError::UnknownKind(kind.clone()))
    }

    pub fn is_loaded(&self, kind: &ResourceKind) -> Result<bool, StoreError> {
        self.tables
            .get(kind)
            .map(|table| table.is_loaded())
            .ok_or_else(|| StoreError::UnknownKind(kind.clone()))
    }

    pub fn mark_loaded(&mut self, kind: &ResourceKind) -> Result<(), StoreError> {
        self.table_mut(kind)?.mark_loaded();
        Ok(())
    }

    /// Publish every change made in this transaction. Returns the new
    /// snapshot version.
    pub fn commit(self) -> u64 {
        let WriteTxn {
            store,
            _gate,
            tables,
            base_version,
            inserted,
        } = self;

        let version = base_version + 1;
        let snapshot = Arc::new(Snapshot { tables, version });
        *store
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;

        debug!(version, inserted, "Committed store snapshot");
        version
    }

    /// Discard every change made in this transaction. Dropping the
    /// transaction has the same effect.
    pub fn abort(self) {
        debug!(
            base_version = self.base_version,
            discarded = self.inserted,
            "Aborted store write"
        );
    }
}
