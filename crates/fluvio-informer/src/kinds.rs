//!
//! # Built-in kinds
//!
//! Every kind the factory exposes an accessor for. Authorization and security kinds are
//! needed before the process serves requests and live in the core pool.
//!
use fluvio_informer_model::k8_types::{Crd, CrdNames};
use fluvio_informer_model::{ApiSurface, PoolKind, ResourceKind};

macro_rules! resource_kind {
    ($name:ident, $crd:ident, $group:expr, $kind:expr, $plural:expr, $singular:expr, $pool:expr, $surface:expr) => {
        const $crd: Crd = Crd {
            group: $group,
            version: "v1",
            names: CrdNames {
                kind: $kind,
                plural: $plural,
                singular: $singular,
            },
        };

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl ResourceKind for $name {
            const LABEL: &'static str = $kind;
            const POOL: PoolKind = $pool;
            const SURFACE: ApiSurface = $surface;

            fn crd() -> &'static Crd {
                &$crd
            }
        }
    };
}

const AUTHORIZATION_GROUP: &str = "authorization.openshift.io";
const APPS_GROUP: &str = "apps.openshift.io";
const BUILD_GROUP: &str = "build.openshift.io";
const IMAGE_GROUP: &str = "image.openshift.io";
const SECURITY_GROUP: &str = "security.openshift.io";
const QUOTA_GROUP: &str = "quota.openshift.io";

// core pool
resource_kind!(
    ClusterPolicies,
    CLUSTER_POLICY_V1_API,
    AUTHORIZATION_GROUP,
    "ClusterPolicy",
    "clusterpolicies",
    "clusterpolicy",
    PoolKind::Core,
    ApiSurface::Platform
);
resource_kind!(
    ClusterPolicyBindings,
    CLUSTER_POLICY_BINDING_V1_API,
    AUTHORIZATION_GROUP,
    "ClusterPolicyBinding",
    "clusterpolicybindings",
    "clusterpolicybinding",
    PoolKind::Core,
    ApiSurface::Platform
);
resource_kind!(
    Policies,
    POLICY_V1_API,
    AUTHORIZATION_GROUP,
    "Policy",
    "policies",
    "policy",
    PoolKind::Core,
    ApiSurface::Platform
);
resource_kind!(
    PolicyBindings,
    POLICY_BINDING_V1_API,
    AUTHORIZATION_GROUP,
    "PolicyBinding",
    "policybindings",
    "policybinding",
    PoolKind::Core,
    ApiSurface::Platform
);
resource_kind!(
    SecurityContextConstraints,
    SECURITY_CONTEXT_CONSTRAINTS_V1_API,
    SECURITY_GROUP,
    "SecurityContextConstraints",
    "securitycontextconstraints",
    "securitycontextconstraints",
    PoolKind::Core,
    ApiSurface::Kubernetes
);
resource_kind!(
    ClusterResourceQuotas,
    CLUSTER_RESOURCE_QUOTA_V1_API,
    QUOTA_GROUP,
    "ClusterResourceQuota",
    "clusterresourcequotas",
    "clusterresourcequota",
    PoolKind::Core,
    ApiSurface::Platform
);

// general pool
resource_kind!(
    DeploymentConfigs,
    DEPLOYMENT_CONFIG_V1_API,
    APPS_GROUP,
    "DeploymentConfig",
    "deploymentconfigs",
    "deploymentconfig",
    PoolKind::General,
    ApiSurface::Platform
);
resource_kind!(
    BuildConfigs,
    BUILD_CONFIG_V1_API,
    BUILD_GROUP,
    "BuildConfig",
    "buildconfigs",
    "buildconfig",
    PoolKind::General,
    ApiSurface::Platform
);
resource_kind!(
    Builds,
    BUILD_V1_API,
    BUILD_GROUP,
    "Build",
    "builds",
    "build",
    PoolKind::General,
    ApiSurface::Platform
);
resource_kind!(
    ImageStreams,
    IMAGE_STREAM_V1_API,
    IMAGE_GROUP,
    "ImageStream",
    "imagestreams",
    "imagestream",
    PoolKind::General,
    ApiSurface::Platform
);

#[cfg(test)]
mod test {

    use std::collections::HashSet;

    use fluvio_informer_model::{KindId, PoolKind, ResourceKind};

    use super::*;

    fn core_kinds() -> Vec<KindId> {
        vec![
            ClusterPolicies::kind_id(),
            ClusterPolicyBindings::kind_id(),
            Policies::kind_id(),
            PolicyBindings::kind_id(),
            SecurityContextConstraints::kind_id(),
            ClusterResourceQuotas::kind_id(),
        ]
    }

    #[test]
    fn test_kinds_are_distinct() {
        let mut all = core_kinds();
        all.extend([
            DeploymentConfigs::kind_id(),
            BuildConfigs::kind_id(),
            Builds::kind_id(),
            ImageStreams::kind_id(),
        ]);
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_pools() {
        assert_eq!(Policies::POOL, PoolKind::Core);
        assert_eq!(SecurityContextConstraints::POOL, PoolKind::Core);
        assert_eq!(Builds::POOL, PoolKind::General);
        assert_eq!(ImageStreams::POOL, PoolKind::General);
        assert_eq!(
            Builds::kind_id(),
            KindId::new("build.openshift.io", "v1", "Build")
        );
        assert_eq!(Builds::LABEL, "Build");
    }

    #[test]
    fn test_label_matches_kind() {
        assert_eq!(ClusterPolicies::LABEL, ClusterPolicies::kind_id().kind());
        assert_eq!(
            SecurityContextConstraints::LABEL,
            SecurityContextConstraints::kind_id().kind()
        );
        assert_eq!(ImageStreams::LABEL, ImageStreams::kind_id().kind());
    }
}
