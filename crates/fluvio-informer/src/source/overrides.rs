use std::collections::HashMap;

use fluvio_informer_model::{KindId, ResourceKind};

use super::SharedListWatch;

/// Kinds that must bypass the default client, for example to read straight from the backing store.
/// Fixed once the registry is constructed.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable(HashMap<KindId, SharedListWatch>);

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, kind: KindId, source: SharedListWatch) -> Self {
        self.0.insert(kind, source);
        self
    }

    pub fn with_kind<K: ResourceKind>(self, source: SharedListWatch) -> Self {
        self.with_override(K::kind_id(), source)
    }

    pub fn get(&self, kind: &KindId) -> Option<&SharedListWatch> {
        self.0.get(kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(KindId, SharedListWatch)> for OverrideTable {
    fn from_iter<T: IntoIterator<Item = (KindId, SharedListWatch)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {

    use std::sync::Arc;

    use fluvio_informer_model::KindId;

    use crate::source::{MemoryListWatch, SharedListWatch};

    use super::OverrideTable;

    #[test]
    fn test_lookup() {
        let build = KindId::new("build.openshift.io", "v1", "Build");
        let image = KindId::new("image.openshift.io", "v1", "ImageStream");
        let direct: SharedListWatch = MemoryListWatch::new_shared();

        let table = OverrideTable::new().with_override(build, direct.clone());
        assert_eq!(table.len(), 1);
        assert!(Arc::ptr_eq(table.get(&build).expect("override"), &direct));
        assert!(table.get(&image).is_none());

        let table: OverrideTable = vec![(image, direct)].into_iter().collect();
        assert!(table.get(&build).is_none());
        assert!(table.get(&image).is_some());
    }
}
