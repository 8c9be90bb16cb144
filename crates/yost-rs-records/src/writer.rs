//! Record writer: validation, cooldown normalization and persistence.

use crate::clock::{Clock, SystemClock};
use crate::error::{LinkViolation, RecordError};
use crate::model::{COOLDOWN_WINDOW_SECS, Record, WriteRequest};
use crate::store::RecordStore;
use log::debug;
use std::sync::Arc;

/// Validates write requests and persists them as immutable records.
#[derive(Clone)]
pub struct RecordWriter {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordWriter {
    /// Writer reading time from the system clock.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate, normalize and persist a record with a single store put.
    ///
    /// Returns the record exactly as it was written.
    pub async fn save(&self, request: WriteRequest) -> Result<Record, RecordError> {
        validate(&request)?;
        let record = normalize(request, self.clock.now_secs());
        let item = record.to_item()?;
        self.store.put(item).await?;
        debug!(
            "saved record (display_name={}, created_at={}, visible_after={})",
            record.display_name, record.created_at, record.visible_after
        );
        Ok(record)
    }
}

/// Earliest permissible `visible_after` for a record created at `created_at`.
pub fn cooldown_floor(created_at: i64) -> i64 {
    created_at.saturating_add(COOLDOWN_WINDOW_SECS)
}

/// Check the verified-link rule in both directions; the missing-link case is reported first.
pub fn validate(request: &WriteRequest) -> Result<(), RecordError> {
    let has_verified_link = request.has_verified_link == Some(true);
    match (has_verified_link, request.link()) {
        (true, None) => Err(RecordError::InvalidAttributeCombination(
            LinkViolation::MissingLink,
        )),
        (false, Some(_)) => Err(RecordError::InvalidAttributeCombination(
            LinkViolation::LinkWithoutFlag,
        )),
        _ => Ok(()),
    }
}

/// Build the persisted record for a validated request created at `now`.
fn normalize(request: WriteRequest, now: i64) -> Record {
    let floor = cooldown_floor(now);
    let visible_after = request
        .visible_after
        .filter(|requested| *requested >= floor)
        .unwrap_or(floor);
    let verification_link = request.link().map(str::to_string);
    Record {
        display_name: request.display_name,
        blob_key: request.blob_key,
        created_at: now,
        visible_after,
        has_verified_link: request.has_verified_link.unwrap_or(false),
        is_verified_user: request.is_verified_user.unwrap_or(false),
        verification_link,
    }
}
