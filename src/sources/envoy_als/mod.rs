//! Envoy access log service (ALS) source.
//!
//! Serves `envoy.service.accesslog.v3.AccessLogService`. Each stream is
//! drained sequentially: a batch is translated and forwarded to the
//! [`AnalyticsManager`] before the next one is received. Streams are
//! independent and share only the bound [`TenantContext`].

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use envoy_proto::envoy::service::accesslog::v3::{
    access_log_service_server::{AccessLogService, AccessLogServiceServer},
    stream_access_logs_message::{HttpAccessLogEntries, LogEntries},
    StreamAccessLogsMessage, StreamAccessLogsResponse,
};
use futures::{Stream, StreamExt};
use prost::Message;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{
    codec::CompressionEncoding, transport::Server, Request, Response, Status, Streaming,
};

use crate::{
    analytics::{AnalyticsManager, DeliveryError},
    internal_events::{
        AnalyticsForwardError, EnvoyAlsEntriesReceived, EnvoyAlsStreamClosed,
        EnvoyAlsStreamError, EnvoyAlsStreamIdentified, EnvoyAlsStreamOpened,
        EnvoyAlsUnsupportedEntries,
    },
    tenant::TenantContext,
};

mod record;
mod time;

pub use self::record::{build_record, AuthHeaders};
pub use self::time::{timestamp_add_duration_millis, timestamp_millis};

/// Configuration for the `grpc` table.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GrpcConfig {
    /// The address to listen for connections on.
    ///
    /// It _must_ include a port.
    pub address: SocketAddr,
}

#[derive(Debug, Snafu)]
pub enum ForwardError {
    #[snafu(display("{}", source))]
    Delivery { source: DeliveryError },
    #[snafu(display("Analytics delivery did not accept records within {:?}", timeout))]
    TimedOut {
        timeout: Duration,
        source: tokio::time::error::Elapsed,
    },
}

/// The `AccessLogService` handler for one tenant.
#[derive(Clone)]
pub struct AccessLogServer {
    tenant: Arc<TenantContext>,
    manager: Arc<dyn AnalyticsManager>,
    forward_timeout: Duration,
}

impl AccessLogServer {
    pub fn new(
        tenant: Arc<TenantContext>,
        manager: Arc<dyn AnalyticsManager>,
        forward_timeout: Duration,
    ) -> Self {
        Self {
            tenant,
            manager,
            forward_timeout,
        }
    }

    pub fn into_service(self) -> AccessLogServiceServer<Self> {
        AccessLogServiceServer::new(self).accept_compressed(CompressionEncoding::Gzip)
    }

    /// Drains `stream` until it ends or fails.
    ///
    /// Forwarding failures are reported and the stream keeps going. A
    /// transport error ends the loop and is returned.
    pub async fn run_stream<S>(&self, mut stream: S) -> Result<(), Status>
    where
        S: Stream<Item = Result<StreamAccessLogsMessage, Status>> + Unpin,
    {
        let mut identified = false;
        while let Some(message) = stream.next().await {
            let message = message.map_err(|status| {
                emit!(EnvoyAlsStreamError { status: &status });
                status
            })?;

            if !identified {
                if let Some(identifier) = &message.identifier {
                    let node = identifier.node.clone().unwrap_or_default();
                    emit!(EnvoyAlsStreamIdentified {
                        node_id: &node.id,
                        cluster: &node.cluster,
                        log_name: &identifier.log_name,
                    });
                    identified = true;
                }
            }

            self.dispatch(message).await;
        }

        emit!(EnvoyAlsStreamClosed);
        Ok(())
    }

    async fn dispatch(&self, message: StreamAccessLogsMessage) {
        match message.log_entries {
            Some(LogEntries::HttpLogs(logs)) => {
                let count = logs.log_entry.len();
                if let Err(error) = self.handle_http_logs(logs).await {
                    emit!(AnalyticsForwardError {
                        error: &error,
                        count,
                        tenant: &self.tenant,
                    });
                }
            }
            Some(LogEntries::TcpLogs(logs)) => emit!(EnvoyAlsUnsupportedEntries {
                kind: "tcp",
                count: logs.log_entry.len(),
            }),
            None => emit!(EnvoyAlsUnsupportedEntries {
                kind: "unknown",
                count: 0,
            }),
        }
    }

    /// Translates an HTTP batch and forwards it in a single call.
    ///
    /// Returns the number of records forwarded.
    pub async fn handle_http_logs(
        &self,
        logs: HttpAccessLogEntries,
    ) -> Result<usize, ForwardError> {
        let byte_size = logs.encoded_len();
        let records: Vec<_> = logs
            .log_entry
            .into_iter()
            .map(|entry| build_record(entry, &self.tenant))
            .collect();
        let count = records.len();

        emit!(EnvoyAlsEntriesReceived { count, byte_size });
        if count == 0 {
            return Ok(0);
        }

        let timeout = self.forward_timeout;
        tokio::time::timeout(timeout, self.manager.send_records(&self.tenant, records))
            .await
            .context(TimedOutSnafu { timeout })?
            .context(DeliverySnafu)?;

        Ok(count)
    }
}

#[tonic::async_trait]
impl AccessLogService for AccessLogServer {
    async fn stream_access_logs(
        &self,
        request: Request<Streaming<StreamAccessLogsMessage>>,
    ) -> Result<Response<StreamAccessLogsResponse>, Status> {
        emit!(EnvoyAlsStreamOpened {
            peer_addr: request.remote_addr(),
        });

        self.run_stream(request.into_inner()).await?;
        Ok(Response::new(StreamAccessLogsResponse {}))
    }
}

/// Serves `server` on `listener` until `shutdown` resolves.
///
/// On shutdown, new connections are refused and in-flight streams are
/// allowed to finish.
pub async fn run_grpc_server<F>(
    listener: TcpListener,
    server: AccessLogServer,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()>,
{
    Server::builder()
        .add_service(server.into_service())
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
