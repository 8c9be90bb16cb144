//! Record query engine applying the cooldown and verification filters.

use crate::clock::{Clock, SystemClock};
use crate::error::RecordError;
use crate::model::{QueryRequest, Record};
use crate::store::{AttributePredicate, RecordStore};
use log::debug;
use std::sync::Arc;

/// Looks up records for a display name and hides those still cooling down.
#[derive(Clone)]
pub struct RecordQueryEngine {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordQueryEngine {
    /// Engine reading time from the system clock.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Return the visible records for the requested display name.
    ///
    /// Results keep the store's native order. No matches is an empty vector.
    pub async fn query(&self, request: &QueryRequest) -> Result<Vec<Record>, RecordError> {
        let predicate = request
            .wants_verified_link()
            .then(AttributePredicate::has_verified_link);
        let items = self
            .store
            .query(&request.display_name, predicate.as_ref())
            .await?;
        let now = self.clock.now_secs();
        let fetched = items.len();
        let records = items
            .into_iter()
            .map(Record::from_item)
            .collect::<Result<Vec<_>, _>>()?;
        let records = apply_filters(records, request, now);
        debug!(
            "queried records (display_name={}, fetched={}, visible={}, now={})",
            request.display_name,
            fetched,
            records.len(),
            now
        );
        Ok(records)
    }
}

/// Keep records visible at `now`, then narrow by the requested flags.
pub fn apply_filters(records: Vec<Record>, request: &QueryRequest, now: i64) -> Vec<Record> {
    let verified_links = request.wants_verified_link();
    let verified_users = request.wants_verified_user();
    records
        .into_iter()
        .filter(|record| record.is_visible_at(now))
        .filter(|record| !verified_links || record.has_verified_link)
        .filter(|record| !verified_users || record.is_verified_user)
        .collect()
}
