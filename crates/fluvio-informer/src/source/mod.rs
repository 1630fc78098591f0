mod memory;
mod overrides;

pub use memory::MemoryListWatch;
pub use overrides::OverrideTable;

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::stream::BoxStream;

use fluvio_informer_model::{ApiSurface, KindId, NameSpace, ObjectList, WatchEvent};

pub type SharedListWatch = Arc<dyn ListWatch>;

/// Data source a pipeline lists and watches from
#[async_trait]
pub trait ListWatch: Debug + Send + Sync {
    /// retrieve all objects of a kind with version to resume watching from
    async fn list(&self, kind: &KindId, namespace: &NameSpace) -> Result<ObjectList>;

    /// stream of changes after resource version, stream ends when the server closes the watch
    fn watch(
        &self,
        kind: &KindId,
        namespace: &NameSpace,
        resource_version: Option<String>,
    ) -> BoxStream<'_, Result<Vec<WatchEvent>>>;
}

/// Default clients, one per api surface
#[derive(Debug, Clone)]
pub struct ClientSet {
    kubernetes: SharedListWatch,
    platform: SharedListWatch,
}

impl ClientSet {
    pub fn new(kubernetes: SharedListWatch, platform: SharedListWatch) -> Self {
        Self {
            kubernetes,
            platform,
        }
    }

    /// same client serves every surface
    pub fn single(client: SharedListWatch) -> Self {
        Self::new(client.clone(), client)
    }

    pub fn client(&self, surface: ApiSurface) -> &SharedListWatch {
        match surface {
            ApiSurface::Kubernetes => &self.kubernetes,
            ApiSurface::Platform => &self.platform,
        }
    }
}
