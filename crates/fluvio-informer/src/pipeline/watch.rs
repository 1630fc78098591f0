use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::future::pending;
use tracing::{debug, error, info, instrument, trace};

use fluvio_future::timer::sleep;
use fluvio_informer_model::{KindId, NameSpace, ObjectStore, SharedObjectStore, StopSignal};

use crate::source::SharedListWatch;

use super::{Pipeline, PipelineBuilder, SharedPipeline};

/// wait before listing again when listing failed and resync is disabled
const DEFAULT_RELIST_INTERVAL: Duration = Duration::from_secs(5);

/// List then watch a single kind, keeping an [`ObjectStore`] in sync.
/// Relists whenever the watch stream ends.
#[derive(Debug)]
pub struct WatchPipeline {
    kind: KindId,
    namespace: NameSpace,
    source: SharedListWatch,
    store: SharedObjectStore,
    resync: Option<Duration>,
}

impl WatchPipeline {
    /// zero resync disables periodic resync
    pub fn new(
        kind: KindId,
        namespace: NameSpace,
        source: SharedListWatch,
        resync: Duration,
    ) -> Self {
        Self {
            kind,
            namespace,
            source,
            store: ObjectStore::shared(kind),
            resync: (!resync.is_zero()).then_some(resync),
        }
    }

    /// list everything and replace store content, returns version to resume watch from
    async fn sync_all(&self) -> Result<String> {
        let list = self.source.list(&self.kind, &self.namespace).await?;
        debug!(
            kind = %self.kind,
            items = list.items.len(),
            version = %list.resource_version,
            "listed"
        );
        let status = self.store.sync_all(list.items).await;
        trace!(?status, "sync status");
        Ok(list.resource_version)
    }

    async fn inner_loop(&self, stop: &StopSignal) {
        use tokio::select;

        let resume_version = match self.sync_all().await {
            Ok(version) => version,
            Err(err) => {
                error!(kind = %self.kind, "cannot list objects: {err:#}");
                select! {
                    _ = stop.stopped() => {},
                    _ = sleep(self.resync.unwrap_or(DEFAULT_RELIST_INTERVAL)) => {}
                }
                return;
            }
        };

        let mut watch_stream =
            self.source
                .watch(&self.kind, &self.namespace, Some(resume_version));
        let mut resync_left = self.resync;

        loop {
            let resync_mark = Instant::now();
            trace!(kind = %self.kind, ?resync_left, "waiting for watch events");

            select! {
                _ = stop.stopped() => {
                    debug!(kind = %self.kind, "stop requested");
                    return;
                },

                _ = resync_timer(resync_left) => {
                    let count = self.store.resync().await;
                    debug!(kind = %self.kind, count, "resync");
                    resync_left = self.resync;
                },

                next = watch_stream.next() => {
                    match next {
                        Some(Ok(events)) => {
                            let changes = self.store.apply_all(events).await;
                            trace!(kind = %self.kind, changes, "applied watch events");
                        }
                        Some(Err(err)) => {
                            error!(kind = %self.kind, "watch error: {err:#}");
                            return;
                        }
                        None => {
                            debug!(kind = %self.kind, "watch stream terminated, relisting");
                            return;
                        }
                    }

                    resync_left = resync_left.map(|left| left.saturating_sub(resync_mark.elapsed()));
                }
            }
        }
    }
}

async fn resync_timer(period: Option<Duration>) {
    match period {
        Some(period) => sleep(period).await,
        None => pending::<()>().await,
    }
}

#[async_trait]
impl Pipeline for WatchPipeline {
    fn kind(&self) -> &KindId {
        &self.kind
    }

    fn store(&self) -> &SharedObjectStore {
        &self.store
    }

    #[instrument(skip_all, fields(kind = %self.kind))]
    async fn run(&self, stop: StopSignal) {
        info!("starting informer loop");
        while !stop.is_stopped() {
            self.inner_loop(&stop).await;
        }
        info!("informer loop stopped");
    }
}

/// Builds [`WatchPipeline`] scoped to a namespace
#[derive(Debug, Clone, Default)]
pub struct WatchPipelineBuilder {
    namespace: NameSpace,
}

impl WatchPipelineBuilder {
    pub fn new(namespace: NameSpace) -> Self {
        Self { namespace }
    }

    pub fn shared(namespace: NameSpace) -> Arc<Self> {
        Arc::new(Self::new(namespace))
    }
}

#[async_trait]
impl PipelineBuilder for WatchPipelineBuilder {
    async fn build(
        &self,
        kind: KindId,
        source: SharedListWatch,
        resync: Duration,
    ) -> Result<SharedPipeline> {
        debug!(%kind, namespace = %self.namespace, ?resync, "building watch pipeline");
        Ok(Arc::new(WatchPipeline::new(
            kind,
            self.namespace.clone(),
            source,
            resync,
        )))
    }
}
