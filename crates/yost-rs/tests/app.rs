use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use yost_rs::Yost;
use yost_rs::config::{BlobsConfig, HoldingsConfig, RecordsConfig, StoreBackend, YostConfig};
use yost_rs::holdings::{HoldingsProvider, HoldingsResponse};
use yost_rs::records::{QueryRequest, WriteRequest};
use yost_rs_test_utils::{ManualClock, StubHoldingsApi};

fn memory_config() -> YostConfig {
    YostConfig::builder()
        .records(RecordsConfig {
            backend: StoreBackend::Memory,
            path: None,
        })
        .blobs(BlobsConfig {
            backend: StoreBackend::Memory,
            ..BlobsConfig::default()
        })
        .build()
}

#[tokio::test]
async fn writer_and_engine_share_one_store() {
    let clock = Arc::new(ManualClock::new(1_000));
    let yost = Yost::open_with_clock(memory_config(), clock.clone()).expect("open");

    yost.writer()
        .save(WriteRequest::new("u1", "k1"))
        .await
        .expect("save");
    let engine = yost.query_engine();
    assert!(engine.query(&QueryRequest::new("u1")).await.expect("query").is_empty());

    clock.set(1_600);
    let visible = engine.query(&QueryRequest::new("u1")).await.expect("query");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].blob_key, "k1");
}

#[tokio::test]
async fn file_backends_persist_across_handles() {
    let temp = TempDir::new().expect("tmp");
    let config = YostConfig::builder()
        .records(RecordsConfig {
            backend: StoreBackend::File,
            path: Some(temp.path().join("records").display().to_string()),
        })
        .blobs(BlobsConfig {
            path: Some(temp.path().join("blobs").display().to_string()),
            ..BlobsConfig::default()
        })
        .build();
    let clock = Arc::new(ManualClock::new(10));

    let first = Yost::open_with_clock(config.clone(), clock.clone()).expect("open");
    first
        .writer()
        .save(WriteRequest::new("u1", "avatars/u1.png"))
        .await
        .expect("save");
    let receipt = first
        .blobs()
        .put("avatars/u1.png", b"png")
        .await
        .expect("put");
    assert_eq!(receipt.bucket, "yost");

    clock.advance(600);
    let second = Yost::open_with_clock(config, clock).expect("reopen");
    let records = second
        .query_engine()
        .query(&QueryRequest::new("u1"))
        .await
        .expect("query");
    assert_eq!(records.len(), 1);
    let bytes = second
        .blobs()
        .get(&records[0].blob_key)
        .await
        .expect("get");
    assert_eq!(bytes.as_deref(), Some(&b"png"[..]));
}

#[test]
fn open_rejects_invalid_config() {
    let config = YostConfig::builder()
        .blobs(BlobsConfig {
            backend: StoreBackend::Memory,
            bucket: String::new(),
            path: None,
        })
        .build();
    assert!(Yost::open(config).is_err());
}

#[tokio::test]
async fn holdings_use_configured_link_settings() {
    let config = YostConfig {
        holdings: HoldingsConfig {
            app_name: "Demo".to_string(),
            language: "fr".to_string(),
            country_codes: vec!["CA".to_string()],
        },
        ..memory_config()
    };
    let yost = Yost::open(config).expect("open");
    let adapter = yost.holdings(StubHoldingsApi::new(HoldingsResponse::default()));

    adapter
        .create_link_token(Some("user-1"))
        .await
        .expect("token");
    let requests = adapter.api().link_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].client_name, "Demo");
    assert_eq!(requests[0].language, "fr");
    assert_eq!(requests[0].country_codes, vec!["CA".to_string()]);
}
