//! Handing analytics records to the delivery subsystem.
//!
//! The adapter only depends on the narrow [`AnalyticsManager`] capability.
//! [`BufferedManager`] is the implementation shipped with the binary: a
//! bounded queue drained into a line-delimited JSON output.

mod buffer;
mod config;
mod record;
mod writer;

use async_trait::async_trait;
use snafu::Snafu;

pub use self::buffer::{BufferedManager, DrainHandle, RecordBatch};
pub use self::config::{BuildError, DeliveryConfig, Target};
pub use self::record::{AnalyticsRecord, GATEWAY_SOURCE};
pub use self::writer::RecordWriter;
use crate::tenant::TenantContext;

/// Errors reported by an [`AnalyticsManager`].
#[derive(Debug, Snafu)]
pub enum DeliveryError {
    #[snafu(display("Analytics delivery is closed"))]
    Closed,
    #[snafu(display("Analytics delivery rejected the records: {}", reason))]
    Rejected { reason: String },
}

/// Accepts batches of records for eventual delivery to a tenant.
///
/// Implementations may buffer, batch and retry internally. A returned error
/// means this batch will not be delivered.
#[async_trait]
pub trait AnalyticsManager: Send + Sync {
    async fn send_records(
        &self,
        tenant: &TenantContext,
        records: Vec<AnalyticsRecord>,
    ) -> Result<(), DeliveryError>;
}
