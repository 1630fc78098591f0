mod feed;

pub use feed::{EventFeed, Notification};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_channel::Sender;
use async_lock::RwLock;
use tracing::{debug, trace};

use fluvio_types::event::StickyEvent;

use crate::kind::KindId;
use crate::object::{ObjectKey, ResourceObject, WatchEvent, NameSpace};

pub type SharedObjectStore = Arc<ObjectStore>;

/// Local cache of the objects of one kind.
/// Only the pipeline writes to it, through `sync_all`, `apply` and `resync`.
/// Every write is published to subscribers while the write lock is held,
/// so a subscriber never observes a change twice or misses one.
#[derive(Debug)]
pub struct ObjectStore {
    kind: KindId,
    state: RwLock<StoreState>,
    synced: Arc<StickyEvent>,
}

#[derive(Debug, Default)]
struct StoreState {
    objects: HashMap<ObjectKey, Arc<ResourceObject>>,
    epoch: i64,
    subscribers: Vec<Sender<Notification>>,
}

impl StoreState {
    fn publish(&mut self, notifications: Vec<Notification>) {
        if notifications.is_empty() {
            return;
        }
        self.epoch += 1;
        self.subscribers.retain(|subscriber| {
            for notification in &notifications {
                if subscriber.try_send(notification.clone()).is_err() {
                    trace!("dropping closed subscriber");
                    return false;
                }
            }
            true
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub epoch: i64,
    pub add: usize,
    pub update: usize,
    pub delete: usize,
}

impl SyncStatus {
    pub fn has_changes(&self) -> bool {
        self.add + self.update + self.delete > 0
    }
}

impl ObjectStore {
    pub fn new(kind: KindId) -> Self {
        Self {
            kind,
            state: RwLock::new(StoreState::default()),
            synced: StickyEvent::shared(),
        }
    }

    pub fn shared(kind: KindId) -> SharedObjectStore {
        Arc::new(Self::new(kind))
    }

    pub fn kind(&self) -> &KindId {
        &self.kind
    }

    /// replace content with full listing, only differences are published
    pub async fn sync_all(&self, items: Vec<ResourceObject>) -> SyncStatus {
        let mut state = self.state.write().await;
        let mut status = SyncStatus::default();
        let mut notifications = vec![];

        let mut previous = std::mem::take(&mut state.objects);
        for item in items {
            let key = item.key();
            match previous.remove(&key) {
                Some(old) if old.is_same(&item) => {
                    state.objects.insert(key, old);
                }
                Some(old) => {
                    let new = Arc::new(item);
                    status.update += 1;
                    notifications.push(Notification::Updated {
                        old,
                        new: new.clone(),
                    });
                    state.objects.insert(key, new);
                }
                None => {
                    let new = Arc::new(item);
                    status.add += 1;
                    notifications.push(Notification::Added(new.clone()));
                    state.objects.insert(key, new);
                }
            }
        }

        for (_, removed) in previous {
            status.delete += 1;
            notifications.push(Notification::Deleted(removed));
        }

        state.publish(notifications);
        status.epoch = state.epoch;
        drop(state);

        debug!(
            kind = %self.kind,
            add = status.add,
            update = status.update,
            delete = status.delete,
            "synced store"
        );
        self.synced.notify();
        status
    }

    /// apply single watch event, returns true if store was changed
    pub async fn apply(&self, event: WatchEvent) -> bool {
        self.apply_all(vec![event]).await > 0
    }

    /// apply batch of watch events, returns number of changes
    pub async fn apply_all(&self, events: Vec<WatchEvent>) -> usize {
        let mut state = self.state.write().await;
        let mut notifications = vec![];

        for event in events {
            match event {
                WatchEvent::Added(obj) | WatchEvent::Modified(obj) => {
                    let key = obj.key();
                    match state.objects.get(&key) {
                        Some(old) if old.is_same(&obj) => {
                            trace!(%key, "no change");
                        }
                        Some(old) => {
                            let old = old.clone();
                            let new = Arc::new(obj);
                            notifications.push(Notification::Updated {
                                old,
                                new: new.clone(),
                            });
                            state.objects.insert(key, new);
                        }
                        None => {
                            let new = Arc::new(obj);
                            notifications.push(Notification::Added(new.clone()));
                            state.objects.insert(key, new);
                        }
                    }
                }
                WatchEvent::Deleted(obj) => {
                    let key = obj.key();
                    if state.objects.remove(&key).is_some() {
                        notifications.push(Notification::Deleted(Arc::new(obj)));
                    } else {
                        trace!(%key, "delete of unknown object");
                    }
                }
            }
        }

        let changes = notifications.len();
        state.publish(notifications);
        changes
    }

    /// re-deliver every cached object as an update
    pub async fn resync(&self) -> usize {
        let mut state = self.state.write().await;
        let mut objects: Vec<_> = state.objects.iter().collect();
        objects.sort_by(|a, b| a.0.cmp(b.0));
        let notifications: Vec<_> = objects
            .into_iter()
            .map(|(_, obj)| Notification::Updated {
                old: obj.clone(),
                new: obj.clone(),
            })
            .collect();
        let count = notifications.len();
        state.publish(notifications);
        trace!(kind = %self.kind, count, "resync");
        count
    }

    /// subscribe to future changes. The feed starts with an add for every cached object.
    pub async fn subscribe(&self) -> EventFeed {
        let mut state = self.state.write().await;
        let (sender, feed) = EventFeed::channel();

        let mut objects: Vec<_> = state.objects.iter().collect();
        objects.sort_by(|a, b| a.0.cmp(b.0));
        for (_, obj) in objects {
            // receiver is alive, unbounded channel can't be full
            let _ = sender.try_send(Notification::Added(obj.clone()));
        }

        state.subscribers.push(sender);
        feed
    }

    pub async fn get(&self, key: &ObjectKey) -> Option<Arc<ResourceObject>> {
        self.state.read().await.objects.get(key).cloned()
    }

    pub async fn contains_key(&self, key: &ObjectKey) -> bool {
        self.state.read().await.objects.contains_key(key)
    }

    /// all objects, ordered by key
    pub async fn list(&self) -> Vec<Arc<ResourceObject>> {
        self.list_namespaced(&NameSpace::All).await
    }

    pub async fn list_namespaced(&self, namespace: &NameSpace) -> Vec<Arc<ResourceObject>> {
        let state = self.state.read().await;
        let mut objects: Vec<_> = state
            .objects
            .iter()
            .filter(|(key, _)| namespace.matches(key.namespace()))
            .collect();
        objects.sort_by(|a, b| a.0.cmp(b.0));
        objects.into_iter().map(|(_, obj)| obj.clone()).collect()
    }

    pub async fn keys(&self) -> Vec<ObjectKey> {
        let mut keys: Vec<_> = self.state.read().await.objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.objects.len()
    }

    /// number of published change batches
    pub async fn epoch(&self) -> i64 {
        self.state.read().await.epoch
    }

    /// true once the first full listing has been applied
    pub fn has_synced(&self) -> bool {
        self.synced.is_set()
    }

    pub async fn wait_for_sync(&self) {
        self.synced.listen().await
    }
}

impl fmt::Display for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Store", self.kind.kind())
    }
}

#[cfg(test)]
mod test {

    use std::sync::Arc;

    use futures_util::StreamExt;

    use crate::fixture::test_object;
    use crate::kind::KindId;
    use crate::object::{ObjectKey, WatchEvent, NameSpace};

    use super::{ObjectStore, Notification};

    fn test_store() -> ObjectStore {
        ObjectStore::new(KindId::new("test.fluvio", "v1", "MySpec"))
    }

    #[fluvio_future::test]
    async fn test_sync_all_diff() {
        let store = test_store();
        assert!(!store.has_synced());

        let status = store
            .sync_all(vec![test_object("ns1", "a", 1), test_object("ns1", "b", 1)])
            .await;
        assert_eq!(status.add, 2);
        assert_eq!(status.epoch, 1);
        assert!(store.has_synced());

        // same content again must not be counted as change
        let status = store
            .sync_all(vec![test_object("ns1", "a", 1), test_object("ns1", "b", 1)])
            .await;
        assert!(!status.has_changes());
        assert_eq!(status.epoch, 1);

        let status = store
            .sync_all(vec![test_object("ns1", "a", 2), test_object("ns2", "c", 1)])
            .await;
        assert_eq!(status.add, 1);
        assert_eq!(status.update, 1);
        assert_eq!(status.delete, 1);
        assert_eq!(
            store.keys().await,
            vec![ObjectKey::new("ns1", "a"), ObjectKey::new("ns2", "c")]
        );
    }

    #[fluvio_future::test]
    async fn test_apply_events() {
        let store = test_store();
        let mut feed = store.subscribe().await;

        assert!(store.apply(WatchEvent::Added(test_object("ns1", "a", 1))).await);
        assert!(!store.apply(WatchEvent::Modified(test_object("ns1", "a", 1))).await);
        assert!(store.apply(WatchEvent::Modified(test_object("ns1", "a", 2))).await);
        assert!(store.apply(WatchEvent::Deleted(test_object("ns1", "a", 2))).await);
        assert!(!store.apply(WatchEvent::Deleted(test_object("ns1", "a", 2))).await);

        assert!(matches!(feed.try_next(), Some(Notification::Added(_))));
        match feed.try_next() {
            Some(Notification::Updated { old, new }) => {
                assert_eq!(old.spec["replicas"], 1);
                assert_eq!(new.spec["replicas"], 2);
            }
            other => panic!("expected update, got: {other:?}"),
        }
        assert!(matches!(feed.try_next(), Some(Notification::Deleted(_))));
        assert!(feed.try_next().is_none());
        assert_eq!(store.count().await, 0);
    }

    #[fluvio_future::test]
    async fn test_late_subscriber_is_primed() {
        let store = test_store();
        store
            .sync_all(vec![test_object("ns1", "b", 1), test_object("ns1", "a", 1)])
            .await;

        let mut feed = store.subscribe().await;
        assert_eq!(feed.pending(), 2);
        let first = feed.try_next().expect("first");
        assert_eq!(first.object().name(), "a");
        assert!(matches!(first, Notification::Added(_)));
    }

    #[fluvio_future::test]
    async fn test_resync_and_dropped_subscriber() {
        let store = test_store();
        store.sync_all(vec![test_object("ns1", "a", 1)]).await;

        let mut feed = store.subscribe().await;
        let dropped = store.subscribe().await;
        drop(dropped);
        feed.try_next().expect("primed add");

        assert_eq!(store.resync().await, 1);
        let resync = feed.try_next().expect("resync");
        assert!(resync.is_resync());
        assert!(Arc::ptr_eq(
            resync.object(),
            &store.get(&ObjectKey::new("ns1", "a")).await.expect("cached")
        ));
    }

    #[fluvio_future::test]
    async fn test_feed_as_stream() {
        let store = test_store();
        store.sync_all(vec![test_object("ns1", "a", 1)]).await;

        let mut stream = std::pin::pin!(store.subscribe().await.into_stream());
        store
            .apply(WatchEvent::Deleted(test_object("ns1", "a", 1)))
            .await;

        let first = stream.next().await.expect("primed");
        assert!(matches!(first, Notification::Added(_)));
        let second = stream.next().await.expect("deleted");
        assert!(matches!(second, Notification::Deleted(obj) if obj.name() == "a"));
    }

    #[fluvio_future::test]
    async fn test_list_namespaced() {
        let store = test_store();
        store
            .sync_all(vec![
                test_object("ns1", "a", 1),
                test_object("ns2", "b", 1),
                test_object("ns1", "c", 1),
            ])
            .await;

        let names: Vec<_> = store
            .list_namespaced(&NameSpace::from("ns1"))
            .await
            .iter()
            .map(|obj| obj.name().to_owned())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(store.list().await.len(), 3);
    }
}
