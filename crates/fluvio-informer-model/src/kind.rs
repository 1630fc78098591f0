//!
//! # Resource kinds
//!
//! Every informer is keyed by a [`KindId`], a plain group/version/kind triple derived from the
//! kind's CRD descriptor. Two requests for the same kind always produce the same key.
//!
use std::fmt;

use crate::k8_types::Crd;

/// Identity of a resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId {
    group: &'static str,
    version: &'static str,
    kind: &'static str,
}

impl KindId {
    pub const fn new(group: &'static str, version: &'static str, kind: &'static str) -> Self {
        Self {
            group,
            version,
            kind,
        }
    }

    pub fn group(&self) -> &'static str {
        self.group
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// api version as used in object manifests, core group has no prefix
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_owned()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl From<&'static Crd> for KindId {
    fn from(crd: &'static Crd) -> Self {
        Self::new(crd.group, crd.version, crd.names.kind)
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Start phase a kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// needed before the process can serve requests
    Core,
    /// started after the process is up
    General,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Which API client serves a kind by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiSurface {
    /// generic kubernetes resources
    Kubernetes,
    /// resources specific to the managed platform
    Platform,
}

/// Descriptor of a resource kind that can be observed by an informer
pub trait ResourceKind: Send + Sync + 'static {
    /// label used in logs
    const LABEL: &'static str;
    const POOL: PoolKind;
    const SURFACE: ApiSurface;

    fn crd() -> &'static Crd;

    fn kind_id() -> KindId {
        KindId::from(Self::crd())
    }
}
