use std::fmt;

use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::k8_types::ObjectMeta;

/// Object as observed from a list/watch source.
/// Spec and status are raw json, decode with [`ResourceObject::spec_as`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceObject {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Value,
    #[serde(default)]
    pub status: Value,
}

impl ResourceObject {
    pub fn new(metadata: ObjectMeta, spec: Value) -> Self {
        Self {
            metadata,
            spec,
            status: Value::Null,
        }
    }

    pub fn with_status(mut self, status: Value) -> Self {
        self.status = status;
        self
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(
            self.metadata.namespace.clone(),
            self.metadata.name.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn resource_version(&self) -> &str {
        &self.metadata.resource_version
    }

    pub fn spec_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.spec.clone())
    }

    pub fn status_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.status.clone())
    }

    /// check if other is the same revision of this object.
    /// when both carry a resource version, that is authoritative
    pub fn is_same(&self, other: &Self) -> bool {
        let version = self.resource_version();
        if !version.is_empty() && !other.resource_version().is_empty() {
            return version == other.resource_version();
        }

        self.spec == other.spec
            && self.status == other.status
            && self.metadata.labels == other.metadata.labels
    }
}

/// Cache key of an object, cluster scoped objects have empty namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    namespace: String,
    name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Scope of a list/watch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameSpace {
    #[default]
    All,
    Named(String),
}

impl NameSpace {
    pub fn matches(&self, namespace: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == namespace,
        }
    }
}

impl From<String> for NameSpace {
    fn from(namespace: String) -> Self {
        if namespace.is_empty() {
            Self::All
        } else {
            Self::Named(namespace)
        }
    }
}

impl From<&str> for NameSpace {
    fn from(namespace: &str) -> Self {
        namespace.to_owned().into()
    }
}

impl fmt::Display for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "<all>"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Result of a full listing
#[derive(Debug, Clone, Default)]
pub struct ObjectList {
    /// version to resume watching from
    pub resource_version: String,
    pub items: Vec<ResourceObject>,
}

/// Change reported by a watch stream
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Added(ResourceObject),
    Modified(ResourceObject),
    Deleted(ResourceObject),
}

impl WatchEvent {
    pub fn object(&self) -> &ResourceObject {
        match self {
            Self::Added(obj) | Self::Modified(obj) | Self::Deleted(obj) => obj,
        }
    }

    pub fn into_object(self) -> ResourceObject {
        match self {
            Self::Added(obj) | Self::Modified(obj) | Self::Deleted(obj) => obj,
        }
    }
}
