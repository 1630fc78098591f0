use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Result, anyhow};
use async_channel::{Sender, unbounded};
use async_lock::{Mutex, RwLock};
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use tracing::{debug, trace};

use fluvio_informer_model::{KindId, NameSpace, ObjectKey, ObjectList, ResourceObject, WatchEvent};

use super::ListWatch;

/// watch events kept for resuming from an older resource version
const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug)]
struct Watcher {
    namespace: NameSpace,
    sender: Sender<Vec<WatchEvent>>,
}

#[derive(Debug, Default)]
struct KindData {
    objects: BTreeMap<ObjectKey, ResourceObject>,
    revision: u64,
    history: VecDeque<(u64, WatchEvent)>,
    watchers: Vec<Watcher>,
}

impl KindData {
    fn publish(&mut self, event: WatchEvent, history_limit: usize) {
        let namespace = event.object().namespace().to_owned();
        self.watchers.retain(|watcher| {
            if !watcher.namespace.matches(&namespace) {
                return true;
            }
            watcher.sender.try_send(vec![event.clone()]).is_ok()
        });

        self.history.push_back((self.revision, event));
        if self.history.len() > history_limit {
            self.history.pop_front();
        }
    }

    /// true if events after `since` were already dropped from history
    fn is_compacted(&self, since: u64) -> bool {
        match self.history.front() {
            Some((oldest, _)) => since.saturating_add(1) < *oldest,
            None => since < self.revision,
        }
    }
}

#[derive(Debug, Default)]
struct KindStore {
    data: RwLock<KindData>,
    list_calls: AtomicU64,
    watch_calls: AtomicU64,
}

/// In memory list/watch source.
/// Serves local mode and tests; every kind gets its own revision counter.
#[derive(Debug)]
pub struct MemoryListWatch {
    stores: Mutex<HashMap<KindId, Arc<KindStore>>>,
    history_limit: usize,
}

impl Default for MemoryListWatch {
    fn default() -> Self {
        Self {
            stores: Mutex::new(HashMap::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MemoryListWatch {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// keep at most `limit` events per kind for resuming watches
    pub fn with_history_limit(limit: usize) -> Arc<Self> {
        Arc::new(Self {
            history_limit: limit,
            ..Default::default()
        })
    }

    async fn get_store(&self, kind: &KindId) -> Arc<KindStore> {
        let mut stores = self.stores.lock().await;
        stores.entry(*kind).or_default().clone()
    }

    /// create or replace object, returns stored object with new resource version
    pub async fn apply(&self, kind: &KindId, mut obj: ResourceObject) -> ResourceObject {
        let store = self.get_store(kind).await;
        let mut data = store.data.write().await;

        data.revision += 1;
        let revision = data.revision;
        obj.metadata.resource_version = revision.to_string();
        if obj.metadata.uid.is_empty() {
            obj.metadata.uid = format!("{}-{}", kind.kind().to_lowercase(), revision);
        }

        let key = obj.key();
        let event = if data.objects.insert(key.clone(), obj.clone()).is_some() {
            WatchEvent::Modified(obj.clone())
        } else {
            WatchEvent::Added(obj.clone())
        };
        debug!(%kind, %key, revision, "memory apply");
        data.publish(event, self.history_limit);
        obj
    }

    pub async fn delete(&self, kind: &KindId, key: &ObjectKey) -> Option<ResourceObject> {
        let store = self.get_store(kind).await;
        let mut data = store.data.write().await;

        let mut obj = data.objects.remove(key)?;
        data.revision += 1;
        obj.metadata.resource_version = data.revision.to_string();
        debug!(%kind, %key, "memory delete");
        data.publish(WatchEvent::Deleted(obj.clone()), self.history_limit);
        Some(obj)
    }

    /// end all open watches of a kind, watchers are expected to list again
    pub async fn close_watches(&self, kind: &KindId) {
        let store = self.get_store(kind).await;
        store.data.write().await.watchers.clear();
    }

    pub async fn list_count(&self, kind: &KindId) -> u64 {
        self.get_store(kind).await.list_calls.load(Ordering::SeqCst)
    }

    pub async fn watch_count(&self, kind: &KindId) -> u64 {
        self.get_store(kind).await.watch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListWatch for MemoryListWatch {
    async fn list(&self, kind: &KindId, namespace: &NameSpace) -> Result<ObjectList> {
        let store = self.get_store(kind).await;
        store.list_calls.fetch_add(1, Ordering::SeqCst);

        let data = store.data.read().await;
        let items = data
            .objects
            .iter()
            .filter(|(key, _)| namespace.matches(key.namespace()))
            .map(|(_, obj)| obj.clone())
            .collect();

        Ok(ObjectList {
            resource_version: data.revision.to_string(),
            items,
        })
    }

    fn watch(
        &self,
        kind: &KindId,
        namespace: &NameSpace,
        resource_version: Option<String>,
    ) -> BoxStream<'_, Result<Vec<WatchEvent>>> {
        let kind = *kind;
        let namespace = namespace.clone();

        stream::once(async move {
            let store = self.get_store(&kind).await;
            let (sender, receiver) = unbounded();
            let mut data = store.data.write().await;

            // without a version the watch starts from now
            let since = match resource_version {
                Some(version) => version.parse::<u64>().unwrap_or_default(),
                None => data.revision,
            };

            if data.is_compacted(since) {
                debug!(%kind, since, "resource version too old");
                let gone: Result<Vec<WatchEvent>> =
                    Err(anyhow!("resource version {since} of {kind} is too old"));
                return stream::iter(vec![gone]).boxed();
            }

            let missed: Vec<WatchEvent> = data
                .history
                .iter()
                .filter(|(revision, event)| {
                    *revision > since && namespace.matches(event.object().namespace())
                })
                .map(|(_, event)| event.clone())
                .collect();
            if !missed.is_empty() {
                trace!(%kind, since, count = missed.len(), "replaying missed events");
                let _ = sender.try_send(missed);
            }

            data.watchers.push(Watcher { namespace, sender });
            store.watch_calls.fetch_add(1, Ordering::SeqCst);
            receiver.map(Ok).boxed()
        })
        .flatten()
        .boxed()
    }
}
