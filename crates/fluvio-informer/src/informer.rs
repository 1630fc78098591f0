use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use fluvio_informer_model::{
    EventFeed, KindId, NameSpace, ObjectKey, PoolKind, ResourceKind, ResourceObject,
    SharedObjectStore,
};

use crate::InformerError;
use crate::pipeline::{Pipeline, SharedPipeline};
use crate::registry::SharedRegistry;

/// Typed view of the shared pipeline of kind `K`.
/// Holds no state of its own; every call resolves through the registry,
/// so any two informers of the same kind and registry are interchangeable.
pub struct Informer<K> {
    registry: SharedRegistry,
    pool: PoolKind,
    kind: PhantomData<fn() -> K>,
}

impl<K> Informer<K>
where
    K: ResourceKind,
{
    pub(crate) fn new(registry: SharedRegistry, pool: PoolKind) -> Self {
        Self {
            registry,
            pool,
            kind: PhantomData,
        }
    }

    pub fn kind_id(&self) -> KindId {
        K::kind_id()
    }

    pub fn pool(&self) -> PoolKind {
        self.pool
    }

    /// underlying pipeline, registered on first use
    pub async fn pipeline(&self) -> Result<SharedPipeline, InformerError> {
        self.registry.get_or_create_kind::<K>(self.pool).await
    }

    pub async fn lister(&self) -> Result<Lister<K>, InformerError> {
        let pipeline = self.pipeline().await?;
        Ok(Lister::new(pipeline.store().clone()))
    }

    /// feed of changes, starts with an add for every object already cached
    pub async fn subscribe(&self) -> Result<EventFeed, InformerError> {
        let pipeline = self.pipeline().await?;
        Ok(pipeline.store().subscribe().await)
    }

    pub async fn has_synced(&self) -> Result<bool, InformerError> {
        Ok(self.pipeline().await?.store().has_synced())
    }
}

impl<K> Clone for Informer<K> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            pool: self.pool,
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Informer<K> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry) && self.pool == other.pool
    }
}

impl<K> Eq for Informer<K> {}

impl<K: ResourceKind> fmt::Debug for Informer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Informer")
            .field("kind", &K::kind_id())
            .field("pool", &self.pool)
            .finish()
    }
}

/// Read only access to cached objects of kind `K`
pub struct Lister<K> {
    store: SharedObjectStore,
    kind: PhantomData<fn() -> K>,
}

impl<K> Lister<K>
where
    K: ResourceKind,
{
    fn new(store: SharedObjectStore) -> Self {
        Self {
            store,
            kind: PhantomData,
        }
    }

    pub async fn list(&self) -> Vec<Arc<ResourceObject>> {
        self.store.list().await
    }

    pub async fn list_namespaced(&self, namespace: &NameSpace) -> Vec<Arc<ResourceObject>> {
        self.store.list_namespaced(namespace).await
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Option<Arc<ResourceObject>> {
        self.store.get(&ObjectKey::new(namespace, name)).await
    }

    /// cluster scoped lookup
    pub async fn get_cluster(&self, name: &str) -> Option<Arc<ResourceObject>> {
        self.store.get(&ObjectKey::cluster(name)).await
    }

    /// decode spec of every cached object
    pub async fn specs<T: DeserializeOwned>(&self) -> Result<Vec<(ObjectKey, T)>, InformerError> {
        self.store
            .list()
            .await
            .into_iter()
            .map(|obj| {
                let key = obj.key();
                obj.spec_as::<T>()
                    .map(|spec| (key.clone(), spec))
                    .map_err(|reason| InformerError::Decode {
                        kind: K::kind_id(),
                        key,
                        reason,
                    })
            })
            .collect()
    }

    pub fn store(&self) -> &SharedObjectStore {
        &self.store
    }
}

impl<K> Clone for Lister<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> fmt::Debug for Lister<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lister({})", K::kind_id())
    }
}
