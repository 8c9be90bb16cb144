//! Store wiring for a loaded configuration.

use log::info;
use std::sync::Arc;
use thiserror::Error;
use yost_rs_blob::{BlobError, BlobStore, FileBlobStore, MemoryBlobStore};
use yost_rs_config::{BlobsConfig, ConfigError, RecordsConfig, StoreBackend, YostConfig};
use yost_rs_holdings::{HoldingsAdapter, HoldingsApi, LinkSettings};
use yost_rs_records::{
    Clock, FileRecordStore, MemoryRecordStore, RecordError, RecordQueryEngine, RecordStore,
    RecordWriter, SystemClock,
};

/// Errors raised while opening the configured stores.
#[derive(Debug, Error)]
pub enum YostError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Records(#[from] RecordError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

/// Open the record store selected by `config`.
pub fn open_record_store(config: &RecordsConfig) -> Result<Arc<dyn RecordStore>, YostError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("using in-memory record store");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreBackend::File => {
            let root = config.resolved_path()?;
            Ok(Arc::new(FileRecordStore::new(root)?))
        }
    }
}

/// Open the blob store selected by `config`.
pub fn open_blob_store(config: &BlobsConfig) -> Result<Arc<dyn BlobStore>, YostError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("using in-memory blob store (bucket={})", config.bucket);
            Ok(Arc::new(MemoryBlobStore::new(config.bucket.clone())))
        }
        StoreBackend::File => {
            let root = config.resolved_path()?;
            Ok(Arc::new(FileBlobStore::new(root, config.bucket.clone())?))
        }
    }
}

/// Handle over the configured stores.
///
/// The writer and engine handed out share one record store and one clock.
#[derive(Clone)]
pub struct Yost {
    config: YostConfig,
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl Yost {
    /// Open every store named by `config`, reading time from the system clock.
    pub fn open(config: YostConfig) -> Result<Self, YostError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: YostConfig, clock: Arc<dyn Clock>) -> Result<Self, YostError> {
        config.validate()?;
        let records = open_record_store(&config.records)?;
        let blobs = open_blob_store(&config.blobs)?;
        Ok(Self {
            config,
            records,
            blobs,
            clock,
        })
    }

    pub fn config(&self) -> &YostConfig {
        &self.config
    }

    pub fn writer(&self) -> RecordWriter {
        RecordWriter::with_clock(self.records.clone(), self.clock.clone())
    }

    pub fn query_engine(&self) -> RecordQueryEngine {
        RecordQueryEngine::with_clock(self.records.clone(), self.clock.clone())
    }

    pub fn blobs(&self) -> Arc<dyn BlobStore> {
        self.blobs.clone()
    }

    /// Link settings derived from the `holdings` section.
    pub fn link_settings(&self) -> LinkSettings {
        let holdings = &self.config.holdings;
        LinkSettings {
            app_name: holdings.app_name.clone(),
            language: holdings.language.clone(),
            country_codes: holdings.country_codes.clone(),
        }
    }

    /// Holdings adapter over `api` using the configured link settings.
    pub fn holdings<A: HoldingsApi>(&self, api: A) -> HoldingsAdapter<A> {
        HoldingsAdapter::with_settings(api, self.link_settings())
    }
}
