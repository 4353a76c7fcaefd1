//! Ledger operations open named spans, with the store's spans nested inside.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use custody_ledger::{Asset, AssetLedger};
use custody_storage::MemoryStore;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan};

/// Records `(span, parent)` names as spans are created.
#[derive(Clone, Default)]
struct SpanCollector {
    spans: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl<S> tracing_subscriber::Layer<S> for SpanCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        _attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            let parent = span.parent().map(|parent| parent.name().to_owned());
            self.spans.lock().expect("lock poisoned").push((span.name().to_owned(), parent));
        }
    }
}

type Recorded = Arc<Mutex<Vec<(String, Option<String>)>>>;

fn install() -> (Recorded, tracing::subscriber::DefaultGuard) {
    let collector = SpanCollector::default();
    let spans = Arc::clone(&collector.spans);
    let subscriber = tracing_subscriber::registry().with(collector);
    (spans, tracing::subscriber::set_default(subscriber))
}

fn has_span(recorded: &[(String, Option<String>)], name: &str, parent: Option<&str>) -> bool {
    recorded.iter().any(|(span, span_parent)| span == name && span_parent.as_deref() == parent)
}

#[tokio::test]
async fn create_asset_span_wraps_store_calls() {
    let (spans, _guard) = install();

    let ledger = AssetLedger::new(MemoryStore::new());
    ledger.create_asset(Asset::new("Hana", "PDRM", "9", "HP09")).await.unwrap();

    let recorded = spans.lock().expect("lock poisoned");
    assert!(has_span(&recorded, "create_asset", None), "got: {recorded:?}");
    assert!(has_span(&recorded, "get", Some("create_asset")), "got: {recorded:?}");
    assert!(has_span(&recorded, "put", Some("create_asset")), "got: {recorded:?}");
}

#[tokio::test]
async fn every_operation_has_a_span() {
    let (spans, _guard) = install();

    let ledger = AssetLedger::new(MemoryStore::new());
    ledger.seed().await.unwrap();
    ledger.read_asset("Aya").await.unwrap();
    ledger.update_asset(Asset::new("Aya", "RBPF", "2", "HP01")).await.unwrap();
    ledger.asset_exists("Aya").await.unwrap();
    ledger.transfer_asset("Aya", "Siti", "KDN").await.unwrap();
    ledger.all_assets().await.unwrap();
    ledger.delete_asset("Aya").await.unwrap();

    let recorded = spans.lock().expect("lock poisoned");
    for name in [
        "seed",
        "read_asset",
        "update_asset",
        "asset_exists",
        "transfer_asset",
        "all_assets",
        "delete_asset",
    ] {
        assert!(has_span(&recorded, name, None), "missing span {name}, got: {recorded:?}");
    }
    assert!(has_span(&recorded, "scan", Some("all_assets")), "got: {recorded:?}");
}
