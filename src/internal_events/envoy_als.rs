use std::net::SocketAddr;

use metrics::counter;

use super::{
    prelude::{error_stage, error_type},
    InternalEvent,
};
use crate::{sources::envoy_als::ForwardError, tenant::TenantContext};

#[derive(Debug)]
pub struct EnvoyAlsStreamOpened {
    pub peer_addr: Option<SocketAddr>,
}

impl InternalEvent for EnvoyAlsStreamOpened {
    fn emit(self) {
        match self.peer_addr {
            Some(peer_addr) => debug!(message = "Access log stream opened.", %peer_addr),
            None => debug!(message = "Access log stream opened.", peer_addr = "unknown"),
        }
        counter!("grpc_streams_total", "protocol" => "envoy_als").increment(1);
    }
}

#[derive(Debug)]
pub struct EnvoyAlsStreamIdentified<'a> {
    pub node_id: &'a str,
    pub cluster: &'a str,
    pub log_name: &'a str,
}

impl InternalEvent for EnvoyAlsStreamIdentified<'_> {
    fn emit(self) {
        debug!(
            message = "Access log stream identified.",
            node_id = self.node_id,
            cluster = self.cluster,
            log_name = self.log_name,
        );
    }
}

#[derive(Debug)]
pub struct EnvoyAlsStreamClosed;

impl InternalEvent for EnvoyAlsStreamClosed {
    fn emit(self) {
        debug!(message = "Access log stream closed by peer.");
    }
}

#[derive(Debug)]
pub struct EnvoyAlsStreamError<'a> {
    pub status: &'a tonic::Status,
}

impl InternalEvent for EnvoyAlsStreamError<'_> {
    fn emit(self) {
        warn!(
            message = "Access log stream terminated.",
            error = %self.status,
            error_code = ?self.status.code(),
            error_type = error_type::REQUEST_FAILED,
            stage = error_stage::RECEIVING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::REQUEST_FAILED,
            "stage" => error_stage::RECEIVING,
        )
        .increment(1);
    }
}

#[derive(Debug)]
pub struct EnvoyAlsEntriesReceived {
    pub count: usize,
    pub byte_size: usize,
}

impl InternalEvent for EnvoyAlsEntriesReceived {
    fn emit(self) {
        trace!(
            message = "Access log entries received.",
            count = self.count,
            byte_size = self.byte_size,
        );
        counter!("component_received_events_total").increment(self.count as u64);
        counter!("component_received_event_bytes_total").increment(self.byte_size as u64);
    }
}

/// A batch of a log entry kind the adapter does not translate.
#[derive(Debug)]
pub struct EnvoyAlsUnsupportedEntries {
    pub kind: &'static str,
    pub count: usize,
}

impl InternalEvent for EnvoyAlsUnsupportedEntries {
    fn emit(self) {
        debug!(
            message = "Skipping unsupported access log entries.",
            kind = self.kind,
            count = self.count,
        );
        counter!("envoy_als_unsupported_batches_total", "kind" => self.kind).increment(1);
        counter!(
            "component_discarded_events_total",
            "intentional" => "true",
            "reason" => "unsupported_log_kind",
        )
        .increment(self.count as u64);
    }
}

#[derive(Debug)]
pub struct AnalyticsForwardError<'a> {
    pub error: &'a ForwardError,
    pub count: usize,
    pub tenant: &'a TenantContext,
}

impl InternalEvent for AnalyticsForwardError<'_> {
    fn emit(self) {
        let kind = match self.error {
            ForwardError::TimedOut { .. } => error_type::TIMED_OUT,
            ForwardError::Delivery { .. } => error_type::DELIVERY_FAILED,
        };
        error!(
            message = "Failed to forward analytics records.",
            error = %self.error,
            count = self.count,
            organization = self.tenant.organization(),
            environment = self.tenant.environment(),
            error_type = kind,
            stage = error_stage::SENDING,
        );
        counter!(
            "component_errors_total",
            "error_type" => kind,
            "stage" => error_stage::SENDING,
        )
        .increment(1);
        counter!(
            "component_discarded_events_total",
            "intentional" => "false",
            "reason" => "forward_failed",
        )
        .increment(self.count as u64);
    }
}
