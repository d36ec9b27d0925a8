//! In-memory snapshot store.
//!
//! The store keeps one table per registered kind. Readers open a
//! [`ReadTxn`] over the currently published snapshot; writers build a new
//! snapshot inside a [`WriteTxn`] and publish it on commit. Tables are
//! `Arc`-shared between snapshots and copied only when written.
//!
//! Loading every kind before running any check is the caller's job; the
//! store does not enforce that ordering.

mod error;
mod table;
mod transaction;

pub use error::StoreError;
pub use transaction::{ReadTxn, WriteTxn};

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::model::Resource;
use crate::registry::KindRegistry;
use crate::types::ResourceKind;
use table::Table;
use transaction::{Snapshot, Tables};

pub struct Store {
    registry: Arc<KindRegistry>,
    current: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl Store {
    /// Create an empty table for every kind in the registry.
    pub fn new(registry: Arc<KindRegistry>) -> Self {
        let tables: Tables = registry
            .iter()
            .map(|kind| (kind.clone(), Arc::new(Table::default())))
            .collect();
        debug!(kinds = tables.len(), "Created store schema");

        Self {
            registry,
            current: RwLock::new(Arc::new(Snapshot { tables, version: 0 })),
            writer: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<KindRegistry> {
        &self.registry
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn begin_read(&self) -> ReadTxn {
        ReadTxn::new(self.snapshot(), Arc::clone(&self.registry))
    }

    /// Open a write transaction. Blocks while another writer is open.
    pub fn begin_write(&self) -> WriteTxn<'_> {
        let gate = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.snapshot();
        WriteTxn::new(self, gate, &base)
    }

    /// Load a kind's records in one transaction.
    ///
    /// Returns `Ok(false)` without changing anything when the kind has
    /// already been loaded. A failing record aborts the whole batch.
    pub fn load<I>(&self, kind: &ResourceKind, records: I) -> Result<bool, StoreError>
    where
        I: IntoIterator<Item = Resource>,
    {
        let mut txn = self.begin_write();
        if txn.is_loaded(kind)? {
            debug!(%kind, "Kind already loaded, skipping");
            return Ok(false);
        }

        let mut count = 0usize;
        for record in records {
            txn.insert_into(kind, record)?;
            count += 1;
        }
        txn.mark_loaded(kind)?;
        let version = txn.commit();

        debug!(%kind, count, version, "Loaded kind");
        Ok(true)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("kinds", &self.registry.len())
            .field("version", &self.snapshot().version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectMeta, Pod, Record, Service};
    use crate::types::Fqn;
    use std::thread;

    fn pods() -> ResourceKind {
        ResourceKind::new("pods")
    }

    fn pod(ns: &str, name: &str) -> Resource {
        Pod::new(ObjectMeta::new(ns, name)).into()
    }

    fn store() -> Store {
        Store::new(Arc::new(KindRegistry::builtin()))
    }

    #[test]
    fn test_scan_yields_each_fqn_once() {
        let store = store();
        let records: Vec<_> = (0..50).map(|i| pod("ns", &format!("p{i:02}"))).collect();
        assert!(store.load(&pods(), records).unwrap());

        let txn = store.begin_read();
        let fqns: Vec<Fqn> = txn.scan(&pods()).unwrap().map(|r| r.fqn()).collect();
        assert_eq!(fqns.len(), 50);
        let mut sorted = fqns.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(fqns, sorted);
        for fqn in &fqns {
            assert!(txn.get(&pods(), fqn.as_str()).unwrap().is_some());
        }
    }

    #[test]
    fn test_reinsert_replaces() {
        let store = store();
        let mut txn = store.begin_write();
        assert!(!txn.insert(pod("default", "p1")).unwrap());
        let relabeled: Resource =
            Pod::new(ObjectMeta::new("default", "p1").with_label("v", "2")).into();
        assert!(txn.insert(relabeled).unwrap());
        txn.commit();

        let read = store.begin_read();
        assert_eq!(read.count(&pods()).unwrap(), 1);
        let stored = read.get_as::<Pod>(&pods(), "default/p1").unwrap().unwrap();
        assert_eq!(stored.labels().get("v").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_second_load_is_noop() {
        let store = store();
        assert!(store.load(&pods(), vec![pod("a", "p1")]).unwrap());
        assert!(!store.load(&pods(), vec![pod("a", "p2")]).unwrap());

        let txn = store.begin_read();
        assert_eq!(txn.count(&pods()).unwrap(), 1);
        assert!(txn.is_loaded(&pods()).unwrap());
    }

    #[test]
    fn test_unknown_kind_vs_missing_key() {
        let store = store();
        let txn = store.begin_read();
        assert_eq!(txn.get(&pods(), "default/missing").unwrap(), None);
        assert_eq!(
            txn.get(&ResourceKind::new("widgets"), "x").unwrap_err(),
            StoreError::UnknownKind(ResourceKind::new("widgets"))
        );
        assert!(txn.scan(&ResourceKind::new("widgets")).is_err());
    }

    #[test]
    fn test_kind_mismatch_aborts_load() {
        let store = store();
        let svc: Resource = Service::new(ObjectMeta::new("a", "s1")).into();
        let err = store.load(&pods(), vec![pod("a", "p1"), svc]).unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { .. }));

        let txn = store.begin_read();
        assert_eq!(txn.count(&pods()).unwrap(), 0);
        assert!(!txn.is_loaded(&pods()).unwrap());
    }

    #[test]
    fn test_insert_unregistered_kind() {
        let store = Store::new(Arc::new(KindRegistry::new().with_kind("services")));
        let mut txn = store.begin_write();
        assert_eq!(
            txn.insert(pod("a", "p1")).unwrap_err(),
            StoreError::UnknownKind(pods())
        );
    }

    #[test]
    fn test_read_isolation_from_later_commit() {
        let store = store();
        store.load(&pods(), vec![pod("a", "p1")]).unwrap();
        let before = store.begin_read();

        let mut txn = store.begin_write();
        txn.insert(pod("a", "p2")).unwrap();
        txn.commit();

        assert_eq!(before.count(&pods()).unwrap(), 1);
        assert_eq!(store.begin_read().count(&pods()).unwrap(), 2);
        assert!(store.begin_read().version() > before.version());
    }

    #[test]
    fn test_abort_discards() {
        let store = store();
        let mut txn = store.begin_write();
        txn.insert(pod("a", "p1")).unwrap();
        txn.abort();

        let mut txn = store.begin_write();
        txn.insert(pod("a", "p2")).unwrap();
        drop(txn);

        assert_eq!(store.begin_read().count(&pods()).unwrap(), 0);
        assert_eq!(store.begin_read().version(), 0);
    }

    #[test]
    fn test_scan_namespace() {
        let store = store();
        store
            .load(&pods(), vec![pod("a", "p1"), pod("b", "p1"), pod("a", "p2")])
            .unwrap();

        let txn = store.begin_read();
        let in_a: Vec<_> = txn
            .scan_namespace_as::<Pod>(&pods(), "a")
            .unwrap()
            .map(|p| p.fqn())
            .collect();
        assert_eq!(in_a, vec![Fqn::from("a/p1"), Fqn::from("a/p2")]);
        assert_eq!(txn.namespaces(&pods()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_readers() {
        let store = store();
        let records: Vec<_> = (0..100).map(|i| pod("ns", &format!("p{i}"))).collect();
        store.load(&pods(), records).unwrap();
        let txn = store.begin_read();

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    assert_eq!(txn.scan(&pods()).unwrap().count(), 100);
                    assert!(txn.get(&pods(), "ns/p42").unwrap().is_some());
                });
            }
        });
    }
}
