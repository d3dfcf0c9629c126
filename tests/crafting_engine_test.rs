//! End-to-end engine behaviour over real store adapters.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{base, el, engine_over, json_store, setup_test_logging, sqlite_store};
use crafter::adapters::fetchers::MockFetcher;
use crafter::adapters::json_file::JsonFileStore;
use crafter::domain::ports::ElementStore;
use crafter::services::{CraftingEngine, DispatcherConfig, ElementCatalog, OrderedSampler, RoundDispatcher};
use crafter::{CraftMode, CraftOptions, DomainError, Element, EngineConfig};
use tokio_util::sync::CancellationToken;

fn steam_fetcher() -> Arc<MockFetcher> {
    Arc::new(MockFetcher::new().with_result(&el("Water"), &el("Fire"), el("Steam")))
}

#[tokio::test]
async fn test_exhaustive_discovers_steam_then_stops() {
    setup_test_logging();
    let store = sqlite_store().await;
    let fetcher = steam_fetcher();
    let mut engine = engine_over(store.clone(), &["Water", "Fire"], fetcher.clone(), EngineConfig::default()).await;

    let report = engine
        .run(CraftMode::ExhaustiveBase, &CraftOptions::default())
        .await
        .unwrap();

    // Round 1: {Water, Fire} x base, 7 distinct pairs, only Water+Fire succeeds.
    assert_eq!(report.rounds.len(), 2);
    assert_eq!(report.rounds[0].pairs_dispatched, 7);
    assert_eq!(report.rounds[0].discovered, vec![el("Steam")]);

    // Round 2: Steam x base finds nothing new, so the loop ends.
    assert_eq!(report.rounds[1].pairs_dispatched, 4);
    assert!(report.rounds[1].discovered.is_empty());
    assert!(!report.truncated);
    assert_eq!(fetcher.call_count(), 11);

    assert_eq!(report.total_known, 3);
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_round_closure_every_known_element_meets_every_base() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_result(&el("Water"), &base("Fire"), el("Steam"))
            .with_result(&el("Steam"), &base("Earth"), el("Geyser")),
    );
    let (_dir, store) = json_store();
    let mut engine = engine_over(store, &["Water"], fetcher.clone(), EngineConfig::default()).await;

    engine
        .run(CraftMode::ExhaustiveBase, &CraftOptions::default())
        .await
        .unwrap();

    let looked_up = fetcher.resolved_pairs().await;
    for name in ["Water", "Steam", "Geyser"] {
        for b in Element::base_set() {
            assert!(
                looked_up.iter().any(|p| p.contains(&el(name)) && p.contains(&b)),
                "{name} was never paired with {}",
                b.name()
            );
        }
    }
}

#[tokio::test]
async fn test_rescan_all_known_revisits_old_elements() {
    let config = EngineConfig {
        rescan_all_known: true,
        ..Default::default()
    };
    let (_dir, store) = json_store();
    let fetcher = steam_fetcher();
    let mut engine = engine_over(store, &["Water", "Fire"], fetcher.clone(), config).await;

    let report = engine
        .run(CraftMode::ExhaustiveBase, &CraftOptions::default())
        .await
        .unwrap();

    // Round 2 pairs the whole known set {Fire, Steam, Water} with base.
    assert_eq!(report.rounds.len(), 2);
    assert_eq!(report.rounds[1].pairs_dispatched, 11);
}

#[tokio::test]
async fn test_discoveries_survive_reload() {
    let (dir, store) = json_store();
    let mut engine = engine_over(store, &["Water", "Fire"], steam_fetcher(), EngineConfig::default()).await;
    engine
        .run(CraftMode::RandomWithBase, &CraftOptions::with_count(2))
        .await
        .unwrap();
    drop(engine);

    let reopened = JsonFileStore::new(dir.path().join("elements.json"));
    let names: Vec<String> = reopened
        .load()
        .await
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert!(names.contains(&"Steam".to_string()));
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn test_random_with_base_under_samples_gracefully() {
    let (_dir, store) = json_store();
    let fetcher = Arc::new(MockFetcher::new());
    let mut engine = engine_over(store, &["A", "B", "C"], fetcher.clone(), EngineConfig::default()).await;

    let report = engine
        .run(CraftMode::RandomWithBase, &CraftOptions::with_count(10))
        .await
        .unwrap();

    assert_eq!(report.pairs_dispatched(), 12);
    assert_eq!(report.failed(), 12);
    assert_eq!(report.discovered_count(), 0);
}

#[tokio::test]
async fn test_invalid_mode_fails_before_any_fetch() {
    let (_dir, store) = json_store();
    let fetcher = steam_fetcher();
    let mut engine = engine_over(store, &["Water"], fetcher.clone(), EngineConfig::default()).await;

    for bad in ["7", "sideways", ""] {
        let err = engine.run_code(bad, &CraftOptions::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidMode(_)));
    }
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_persistence_failure_propagates() {
    let dir = common::temp_dir();
    // The store path is a directory, so the rename into place fails.
    let target = dir.path().join("elements.json");
    std::fs::create_dir_all(&target).unwrap();
    let store: Arc<dyn ElementStore> = Arc::new(JsonFileStore::new(&target));

    let dispatcher = RoundDispatcher::new(steam_fetcher(), DispatcherConfig::default());
    let mut engine = CraftingEngine::new(
        ElementCatalog::new(store),
        dispatcher,
        Arc::new(OrderedSampler),
        EngineConfig::default(),
    );

    let options = CraftOptions {
        first: Some("Water".to_string()),
        second: Some("Fire".to_string()),
        ..Default::default()
    };
    let err = engine.run(CraftMode::SpecificPair, &options).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::PersistenceFailed(_) | DomainError::SerializationError(_)
    ));
    assert!(!engine.catalog().known().contains("Steam"));
    assert_eq!(engine.catalog().pending().len(), 1);
}

#[tokio::test]
async fn test_cancellation_skips_merge() {
    let (_dir, store) = json_store();
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_result(&el("Water"), &el("Fire"), el("Steam"))
            .with_delay(Duration::from_secs(30)),
    );
    let cancel = CancellationToken::new();
    store.persist(&[el("Water")]).await.unwrap();

    let dispatcher = RoundDispatcher::new(fetcher, DispatcherConfig::default()).with_cancellation(cancel.clone());
    let mut engine = CraftingEngine::new(
        ElementCatalog::new(store.clone()),
        dispatcher,
        Arc::new(OrderedSampler),
        EngineConfig::default(),
    );
    engine.load().await.unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let err = engine
        .run(CraftMode::ExhaustiveBase, &CraftOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Cancelled { round: 1 }));
    assert_eq!(engine.catalog().known().len(), 1);
    assert!(engine.catalog().pending().is_empty());
    assert_eq!(store.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_timeouts_degrade_to_error() {
    let (_dir, store) = json_store();
    let fetcher = Arc::new(
        MockFetcher::with_default_response(el("Slow")).with_delay(Duration::from_millis(500)),
    );
    let config = EngineConfig {
        pair_timeout_secs: 1,
        ..Default::default()
    };
    let mut dispatcher_config = DispatcherConfig::from(&config);
    dispatcher_config.pair_timeout = Duration::from_millis(20);

    store.persist(&[el("Water")]).await.unwrap();
    let mut engine = CraftingEngine::new(
        ElementCatalog::new(store),
        RoundDispatcher::new(fetcher, dispatcher_config),
        Arc::new(OrderedSampler),
        config,
    );
    engine.load().await.unwrap();

    let report = engine
        .run(CraftMode::RandomWithBase, &CraftOptions::with_count(1))
        .await
        .unwrap();
    assert_eq!(report.failed(), 4);
    assert_eq!(report.discovered_count(), 0);
}
