//!
//! # Informer factory
//!
//! Entry point for the rest of the process. Owns the registry and exposes one typed
//! accessor per built-in kind, plus the wrapped general purpose bundles.
//!
use std::time::Duration;

use tracing::info;

use fluvio_informer_model::{NameSpace, PoolKind, ResourceKind, StopSignal};

use crate::config::InformerConfig;
use crate::informer::Informer;
use crate::kinds::*;
use crate::pipeline::{SharedPipelineBuilder, WatchPipelineBuilder};
use crate::registry::{InformerRegistry, SharedRegistry};
use crate::source::{ClientSet, OverrideTable, SharedListWatch};

/// General purpose bundle serving informers for any kind from a single client.
/// Every kind lives in the general pool.
#[derive(Debug, Clone)]
pub struct SharedInformers {
    registry: SharedRegistry,
}

impl SharedInformers {
    pub fn new(builder: SharedPipelineBuilder, client: SharedListWatch, resync: Duration) -> Self {
        Self::from_registry(InformerRegistry::shared(
            builder,
            ClientSet::single(client),
            OverrideTable::new(),
            resync,
        ))
    }

    pub fn from_registry(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    pub fn informer<K: ResourceKind>(&self) -> Informer<K> {
        Informer::new(self.registry.clone(), PoolKind::General)
    }

    /// returns number of informers launched by this call
    pub async fn start(&self, stop: &StopSignal) -> usize {
        self.registry.start(stop).await
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }
}

#[derive(Debug, Clone)]
pub struct InformerFactory {
    registry: SharedRegistry,
    kube_informers: SharedInformers,
    internal_kube_informers: SharedInformers,
}

impl InformerFactory {
    pub fn new(
        internal_kube_informers: SharedInformers,
        kube_informers: SharedInformers,
        kube_client: SharedListWatch,
        platform_client: SharedListWatch,
        overrides: OverrideTable,
        default_resync: Duration,
    ) -> Self {
        Self::with_builder(
            WatchPipelineBuilder::shared(NameSpace::All),
            internal_kube_informers,
            kube_informers,
            ClientSet::new(kube_client, platform_client),
            overrides,
            default_resync,
        )
    }

    /// same as [`InformerFactory::new`], namespace and resync taken from config
    pub fn from_config(
        config: &InformerConfig,
        internal_kube_informers: SharedInformers,
        kube_informers: SharedInformers,
        kube_client: SharedListWatch,
        platform_client: SharedListWatch,
        overrides: OverrideTable,
    ) -> Self {
        Self::with_builder(
            WatchPipelineBuilder::shared(config.namespace()),
            internal_kube_informers,
            kube_informers,
            ClientSet::new(kube_client, platform_client),
            overrides,
            config.resync,
        )
    }

    pub fn with_builder(
        builder: SharedPipelineBuilder,
        internal_kube_informers: SharedInformers,
        kube_informers: SharedInformers,
        clients: ClientSet,
        overrides: OverrideTable,
        default_resync: Duration,
    ) -> Self {
        info!(overrides = overrides.len(), ?default_resync, "creating informer factory");
        Self::from_registry(
            InformerRegistry::shared(builder, clients, overrides, default_resync),
            internal_kube_informers,
            kube_informers,
        )
    }

    pub fn from_registry(
        registry: SharedRegistry,
        internal_kube_informers: SharedInformers,
        kube_informers: SharedInformers,
    ) -> Self {
        Self {
            registry,
            kube_informers,
            internal_kube_informers,
        }
    }

    /// start informers of the general pool; core informers are started by [`Self::start_core`]
    pub async fn start(&self, stop: &StopSignal) -> usize {
        self.registry.start(stop).await
    }

    /// start informers needed before the process serves requests
    pub async fn start_core(&self, stop: &StopSignal) -> usize {
        self.registry.start_core(stop).await
    }

    /// informer of any kind, placed in the kind's pool
    pub fn informer<K: ResourceKind>(&self) -> Informer<K> {
        Informer::new(self.registry.clone(), K::POOL)
    }

    pub fn cluster_policies(&self) -> Informer<ClusterPolicies> {
        self.informer()
    }

    pub fn cluster_policy_bindings(&self) -> Informer<ClusterPolicyBindings> {
        self.informer()
    }

    pub fn policies(&self) -> Informer<Policies> {
        self.informer()
    }

    pub fn policy_bindings(&self) -> Informer<PolicyBindings> {
        self.informer()
    }

    pub fn deployment_configs(&self) -> Informer<DeploymentConfigs> {
        self.informer()
    }

    pub fn build_configs(&self) -> Informer<BuildConfigs> {
        self.informer()
    }

    pub fn builds(&self) -> Informer<Builds> {
        self.informer()
    }

    pub fn image_streams(&self) -> Informer<ImageStreams> {
        self.informer()
    }

    pub fn security_context_constraints(&self) -> Informer<SecurityContextConstraints> {
        self.informer()
    }

    pub fn cluster_resource_quotas(&self) -> Informer<ClusterResourceQuotas> {
        self.informer()
    }

    pub fn kubernetes_informers(&self) -> &SharedInformers {
        &self.kube_informers
    }

    pub fn internal_kubernetes_informers(&self) -> &SharedInformers {
        &self.internal_kube_informers
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }
}
