mod watch;

pub use watch::{WatchPipeline, WatchPipelineBuilder};

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use fluvio_informer_model::{KindId, SharedObjectStore, StopSignal};

use crate::source::SharedListWatch;

pub type SharedPipeline = Arc<dyn Pipeline>;
pub type SharedPipelineBuilder = Arc<dyn PipelineBuilder>;

/// Long running watch/cache loop for one kind
#[async_trait]
pub trait Pipeline: Debug + Send + Sync {
    fn kind(&self) -> &KindId;

    /// snapshot of observed objects, also the subscription point for changes
    fn store(&self) -> &SharedObjectStore;

    /// run until stop is signaled. Not idempotent, the registry runs it at most once.
    async fn run(&self, stop: StopSignal);
}

/// Constructs pipelines for the registry
#[async_trait]
pub trait PipelineBuilder: Debug + Send + Sync {
    async fn build(
        &self,
        kind: KindId,
        source: SharedListWatch,
        resync: Duration,
    ) -> Result<SharedPipeline>;
}
