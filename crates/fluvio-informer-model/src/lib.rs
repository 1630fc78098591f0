pub mod kind;
pub mod object;
pub mod store;
pub mod event;

// re-export k8-types crate
pub use k8_types;

pub use kind::{KindId, ResourceKind, PoolKind, ApiSurface};
pub use object::{ResourceObject, ObjectKey, ObjectList, WatchEvent, NameSpace};
pub use store::{ObjectStore, SharedObjectStore, SyncStatus, EventFeed, Notification};
pub use event::StopSignal;

#[cfg(test)]
pub(crate) mod fixture {

    use serde_json::json;

    use crate::k8_types::ObjectMeta;
    use crate::object::ResourceObject;

    /// object with a single replica field, namespaced
    pub fn test_object(namespace: &str, name: &str, replicas: u16) -> ResourceObject {
        ResourceObject::new(
            ObjectMeta::new(name, namespace),
            json!({ "replicas": replicas }),
        )
    }
}
