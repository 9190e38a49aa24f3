//! In-memory [`AnalyticsManager`] fakes.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use crate::{
    analytics::{AnalyticsManager, AnalyticsRecord, DeliveryError, RecordBatch},
    tenant::TenantContext,
};

/// Accepts every batch and keeps it for inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingManager {
    batches: Arc<Mutex<Vec<RecordBatch>>>,
}

impl RecordingManager {
    pub fn batches(&self) -> Vec<RecordBatch> {
        self.batches.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<AnalyticsRecord> {
        self.batches()
            .into_iter()
            .flat_map(|batch| batch.records)
            .collect()
    }
}

#[async_trait]
impl AnalyticsManager for RecordingManager {
    async fn send_records(
        &self,
        tenant: &TenantContext,
        records: Vec<AnalyticsRecord>,
    ) -> Result<(), DeliveryError> {
        self.batches.lock().unwrap().push(RecordBatch {
            tenant: tenant.clone(),
            records,
        });
        Ok(())
    }
}

/// Rejects every batch.
#[derive(Clone, Debug, Default)]
pub struct FailingManager {
    calls: Arc<AtomicUsize>,
}

impl FailingManager {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsManager for FailingManager {
    async fn send_records(
        &self,
        _tenant: &TenantContext,
        _records: Vec<AnalyticsRecord>,
    ) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DeliveryError::Rejected {
            reason: "rejected by test".to_owned(),
        })
    }
}

/// Never completes a send.
#[derive(Clone, Debug, Default)]
pub struct StalledManager {
    calls: Arc<AtomicUsize>,
}

impl StalledManager {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsManager for StalledManager {
    async fn send_records(
        &self,
        _tenant: &TenantContext,
        _records: Vec<AnalyticsRecord>,
    ) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        futures::future::pending().await
    }
}
