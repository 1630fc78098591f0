use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join;
use serde_json::json;

use fluvio_future::timer::sleep;
use fluvio_informer::kinds::Builds;
use fluvio_informer::model::k8_types::ObjectMeta;
use fluvio_informer::model::{NameSpace, ResourceKind, ResourceObject, StopSignal};
use fluvio_informer::pipeline::{Pipeline, WatchPipelineBuilder};
use fluvio_informer::source::{MemoryListWatch, OverrideTable, SharedListWatch};
use fluvio_informer::{InformerConfig, InformerFactory, SharedInformers};

fn build(name: &str) -> ResourceObject {
    ResourceObject::new(
        ObjectMeta::new(name, "ns1"),
        json!({ "strategy": "source" }),
    )
}

fn bundle(client: &Arc<MemoryListWatch>) -> SharedInformers {
    SharedInformers::new(
        WatchPipelineBuilder::shared(NameSpace::All),
        client.clone(),
        Duration::from_secs(30),
    )
}

#[fluvio_future::test]
async fn test_overridden_builds_shared_and_started_once() {
    let kind = Builds::kind_id();
    let direct = MemoryListWatch::new_shared();
    let platform = MemoryListWatch::new_shared();
    let kube = MemoryListWatch::new_shared();
    direct.apply(&kind, build("from-direct")).await;
    platform.apply(&kind, build("from-platform")).await;

    let overrides = OverrideTable::new().with_kind::<Builds>(direct.clone() as SharedListWatch);
    let factory = InformerFactory::new(
        bundle(&kube),
        bundle(&kube),
        kube.clone(),
        platform.clone(),
        overrides,
        Duration::from_secs(30),
    );

    let (first, second) = join(factory.builds().pipeline(), factory.builds().pipeline()).await;
    let first = first.expect("pipeline");
    let second = second.expect("pipeline");
    assert!(Arc::ptr_eq(&first, &second));

    let stop = StopSignal::new();
    assert_eq!(factory.start_core(&stop).await, 0);
    assert_eq!(factory.start(&stop).await, 1);
    assert_eq!(factory.start(&stop).await, 0);

    first.store().wait_for_sync().await;
    let lister = factory.builds().lister().await.expect("lister");
    assert!(lister.get("ns1", "from-direct").await.is_some());
    assert!(lister.get("ns1", "from-platform").await.is_none());

    sleep(Duration::from_millis(50)).await;
    assert_eq!(direct.list_count(&kind).await, 1);
    assert_eq!(direct.watch_count(&kind).await, 1);
    assert_eq!(platform.list_count(&kind).await, 0);

    // live changes keep flowing through the single loop
    direct.apply(&kind, build("later")).await;
    sleep(Duration::from_millis(50)).await;
    assert!(lister.get("ns1", "later").await.is_some());

    stop.stop();
}

#[fluvio_future::test]
async fn test_factory_from_config() {
    let kind = Builds::kind_id();
    let platform = MemoryListWatch::new_shared();
    let kube = MemoryListWatch::new_shared();
    platform.apply(&kind, build("in-ns1")).await;
    let mut other = build("in-ns2");
    other.metadata.namespace = "ns2".to_owned();
    platform.apply(&kind, other).await;

    let config: InformerConfig = r#"
        resync = "0s"
        namespace = "ns1"
    "#
    .parse()
    .expect("config");
    let factory = InformerFactory::from_config(
        &config,
        bundle(&kube),
        bundle(&kube),
        kube.clone(),
        platform.clone(),
        OverrideTable::new(),
    );
    assert!(factory.registry().default_resync().is_zero());

    let informer = factory.builds();
    let stop = StopSignal::new();
    informer.pipeline().await.expect("pipeline");
    assert_eq!(factory.start(&stop).await, 1);

    let pipeline = informer.pipeline().await.expect("pipeline");
    pipeline.store().wait_for_sync().await;
    assert!(informer.has_synced().await.expect("synced"));

    let lister = informer.lister().await.expect("lister");
    let names: Vec<String> = lister
        .list()
        .await
        .iter()
        .map(|obj| obj.name().to_owned())
        .collect();
    assert_eq!(names, vec!["in-ns1".to_owned()]);
    stop.stop();
}
