//! Wiring of the running adapter: the bound listener, the gRPC server task
//! and the delivery subsystem behind it.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use snafu::{ResultExt, Snafu};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    analytics::{BuildError, DrainHandle},
    config::Config,
    internal_events::{AdapterShutdownTimedOut, AdapterStarted},
    sources::envoy_als::{run_grpc_server, AccessLogServer},
};

#[derive(Debug, Snafu)]
pub enum StartError {
    #[snafu(display("Failed to set up analytics delivery: {}", source))]
    Delivery { source: BuildError },
    #[snafu(display("Failed to bind to {}: {}", addr, source))]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

pub struct RunningTopology {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<()>,
    drain: DrainHandle,
}

impl RunningTopology {
    /// Builds every piece and starts serving.
    ///
    /// The returned receiver yields if the server stops before it was asked
    /// to.
    pub async fn start(
        config: &Config,
    ) -> Result<(Self, mpsc::UnboundedReceiver<()>), StartError> {
        let tenant = Arc::new(config.tenant.build());
        let (manager, drain) = config.delivery.build().await.context(DeliverySnafu)?;

        let listener = TcpListener::bind(config.grpc.address)
            .await
            .context(BindSnafu {
                addr: config.grpc.address,
            })?;
        let addr = listener.local_addr().context(BindSnafu {
            addr: config.grpc.address,
        })?;

        let server = AccessLogServer::new(
            Arc::clone(&tenant),
            Arc::new(manager),
            config.delivery.forward_timeout(),
        );
        let (shutdown, shutdown_rx) = oneshot::channel();
        let (crash_tx, crash_rx) = mpsc::unbounded_channel();
        let server = tokio::spawn(async move {
            let result = run_grpc_server(listener, server, async move {
                let _ = shutdown_rx.await;
            })
            .await;
            if let Err(error) = result {
                error!(message = "Access log server failed.", %error);
                let _ = crash_tx.send(());
            }
        });

        emit!(AdapterStarted {
            addr,
            tenant: &tenant,
        });

        let topology = Self {
            addr,
            shutdown,
            server,
            drain,
        };
        Ok((topology, crash_rx))
    }

    /// The address the gRPC server listens on.
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting streams, waits for in-flight ones up to `limit`, then
    /// writes out everything the delivery buffer still holds.
    pub async fn stop(self, limit: Duration) {
        let _ = self.shutdown.send(());

        let mut server = self.server;
        match tokio::time::timeout(limit, &mut server).await {
            Ok(Ok(())) => (),
            Ok(Err(error)) => error!(message = "Access log server task failed.", %error),
            Err(_) => {
                emit!(AdapterShutdownTimedOut {
                    limit_secs: limit.as_secs(),
                });
                server.abort();
            }
        }

        // Aborted streams release their handle on the manager, closing the
        // buffer so the drain can finish.
        let _ = self.drain.finish().await;
    }
}
