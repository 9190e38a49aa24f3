use metrics::counter;

use super::{
    prelude::{error_stage, error_type},
    InternalEvent,
};

#[derive(Debug)]
pub struct AnalyticsRecordsWritten {
    pub count: usize,
    pub byte_size: usize,
}

impl InternalEvent for AnalyticsRecordsWritten {
    fn emit(self) {
        trace!(
            message = "Analytics records written.",
            count = self.count,
            byte_size = self.byte_size,
        );
        counter!("component_sent_events_total").increment(self.count as u64);
        counter!("component_sent_event_bytes_total").increment(self.byte_size as u64);
    }
}

#[derive(Debug)]
pub struct AnalyticsEncodeError<'a> {
    pub error: &'a serde_json::Error,
}

impl InternalEvent for AnalyticsEncodeError<'_> {
    fn emit(self) {
        error!(
            message = "Failed to encode analytics record.",
            error = %self.error,
            error_type = error_type::ENCODER_FAILED,
            stage = error_stage::PROCESSING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::ENCODER_FAILED,
            "stage" => error_stage::PROCESSING,
        )
        .increment(1);
        counter!(
            "component_discarded_events_total",
            "intentional" => "false",
            "reason" => "encode_failed",
        )
        .increment(1);
    }
}

/// Writing to the analytics output failed; delivery stops.
#[derive(Debug)]
pub struct AnalyticsWriteError {
    pub error: std::io::Error,
    pub count: usize,
}

impl InternalEvent for AnalyticsWriteError {
    fn emit(self) {
        error!(
            message = "Error writing analytics records. Stopping delivery.",
            error = %self.error,
            count = self.count,
            error_type = error_type::WRITER_FAILED,
            stage = error_stage::SENDING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::WRITER_FAILED,
            "stage" => error_stage::SENDING,
        )
        .increment(1);
        counter!(
            "component_discarded_events_total",
            "intentional" => "false",
            "reason" => "write_failed",
        )
        .increment(self.count as u64);
    }
}
