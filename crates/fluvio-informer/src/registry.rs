//!
//! # Informer registry
//!
//! Single authority over which pipelines exist and which were started.
//! Pipelines live in two independent pools, core and general, each keyed by [`KindId`].
//! One lock guards both pools' bookkeeping; it is never held while a pipeline runs.
//!
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_lock::Mutex;
use tracing::{debug, info, instrument, trace};

use fluvio_future::task::spawn;
use fluvio_informer_model::{ApiSurface, KindId, PoolKind, ResourceKind, StopSignal};

use crate::InformerError;
use crate::pipeline::{Pipeline, SharedPipeline, SharedPipelineBuilder};
use crate::source::{ClientSet, OverrideTable};

pub type SharedRegistry = Arc<InformerRegistry>;

#[derive(Debug, Default)]
struct PipelinePool {
    pipelines: HashMap<KindId, SharedPipeline>,
    started: HashMap<KindId, bool>,
}

impl PipelinePool {
    /// spawn run loop of every pipeline not started yet, returns number launched
    fn start(&mut self, pool: PoolKind, stop: &StopSignal) -> usize {
        let mut launched = 0;
        for (kind, pipeline) in &self.pipelines {
            let started = self.started.entry(*kind).or_insert(false);
            if *started {
                continue;
            }

            debug!(%pool, %kind, "launching pipeline");
            let pipeline = pipeline.clone();
            let stop = stop.clone();
            spawn(async move { pipeline.run(stop).await });
            *started = true;
            launched += 1;
        }
        launched
    }
}

#[derive(Debug, Default)]
struct Pools {
    core: PipelinePool,
    general: PipelinePool,
}

impl Pools {
    fn get(&self, pool: PoolKind) -> &PipelinePool {
        match pool {
            PoolKind::Core => &self.core,
            PoolKind::General => &self.general,
        }
    }

    fn get_mut(&mut self, pool: PoolKind) -> &mut PipelinePool {
        match pool {
            PoolKind::Core => &mut self.core,
            PoolKind::General => &mut self.general,
        }
    }
}

#[derive(Debug)]
pub struct InformerRegistry {
    builder: SharedPipelineBuilder,
    clients: ClientSet,
    overrides: OverrideTable,
    default_resync: Duration,
    pools: Mutex<Pools>,
}

impl InformerRegistry {
    pub fn new(
        builder: SharedPipelineBuilder,
        clients: ClientSet,
        overrides: OverrideTable,
        default_resync: Duration,
    ) -> Self {
        Self {
            builder,
            clients,
            overrides,
            default_resync,
            pools: Mutex::new(Pools::default()),
        }
    }

    pub fn shared(
        builder: SharedPipelineBuilder,
        clients: ClientSet,
        overrides: OverrideTable,
        default_resync: Duration,
    ) -> SharedRegistry {
        Arc::new(Self::new(builder, clients, overrides, default_resync))
    }

    pub fn default_resync(&self) -> Duration {
        self.default_resync
    }

    /// Pipeline for kind in pool, constructed on first request.
    /// The lock is held across lookup and construction so concurrent first requests
    /// construct once. Failed construction is not remembered.
    #[instrument(skip(self))]
    pub async fn get_or_create(
        &self,
        pool: PoolKind,
        kind: KindId,
        surface: ApiSurface,
    ) -> Result<SharedPipeline, InformerError> {
        let mut pools = self.pools.lock().await;

        if let Some(pipeline) = pools.get(pool).pipelines.get(&kind) {
            return Ok(pipeline.clone());
        }

        let source = match self.overrides.get(&kind) {
            Some(source) => {
                debug!("using overridden source");
                source.clone()
            }
            None => self.clients.client(surface).clone(),
        };

        let pipeline = self
            .builder
            .build(kind, source, self.default_resync)
            .await
            .map_err(|reason| InformerError::Construction { kind, reason })?;

        let pipelines = pools.get_mut(pool);
        pipelines.pipelines.insert(kind, pipeline.clone());
        pipelines.started.insert(kind, false);
        info!("registered informer");
        Ok(pipeline)
    }

    pub async fn get_or_create_kind<K: ResourceKind>(
        &self,
        pool: PoolKind,
    ) -> Result<SharedPipeline, InformerError> {
        trace!(label = K::LABEL, %pool, "resolving informer");
        self.get_or_create(pool, K::kind_id(), K::SURFACE).await
    }

    /// start general pool, returns number of pipelines launched by this call
    pub async fn start(&self, stop: &StopSignal) -> usize {
        self.start_pool(PoolKind::General, stop).await
    }

    /// start core pool, returns number of pipelines launched by this call
    pub async fn start_core(&self, stop: &StopSignal) -> usize {
        self.start_pool(PoolKind::Core, stop).await
    }

    async fn start_pool(&self, pool: PoolKind, stop: &StopSignal) -> usize {
        let mut pools = self.pools.lock().await;
        let launched = pools.get_mut(pool).start(pool, stop);
        info!(%pool, launched, "started informers");
        launched
    }

    pub async fn is_started(&self, pool: PoolKind, kind: &KindId) -> bool {
        let pools = self.pools.lock().await;
        pools
            .get(pool)
            .started
            .get(kind)
            .copied()
            .unwrap_or(false)
    }

    /// kinds registered in pool, sorted
    pub async fn kinds(&self, pool: PoolKind) -> Vec<KindId> {
        let pools = self.pools.lock().await;
        let mut kinds: Vec<_> = pools.get(pool).pipelines.keys().copied().collect();
        kinds.sort();
        kinds
    }
}
