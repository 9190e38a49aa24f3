use std::net::SocketAddr;

use metrics::counter;

use super::InternalEvent;
use crate::{get_version, tenant::TenantContext};

#[derive(Debug)]
pub struct AdapterStarted<'a> {
    pub addr: SocketAddr,
    pub tenant: &'a TenantContext,
}

impl InternalEvent for AdapterStarted<'_> {
    fn emit(self) {
        info!(
            message = "Adapter has started.",
            version = %get_version(),
            address = %self.addr,
            organization = self.tenant.organization(),
            environment = self.tenant.environment(),
        );
        counter!("started_total").increment(1);
    }
}

#[derive(Debug)]
pub struct AdapterStopping;

impl InternalEvent for AdapterStopping {
    fn emit(self) {
        info!(message = "Adapter is stopping gracefully. Send SIGQUIT or interrupt again to exit immediately.");
    }
}

#[derive(Debug)]
pub struct AdapterStopped;

impl InternalEvent for AdapterStopped {
    fn emit(self) {
        info!(message = "Adapter has stopped.");
        counter!("stopped_total").increment(1);
    }
}

#[derive(Debug)]
pub struct AdapterQuit;

impl InternalEvent for AdapterQuit {
    fn emit(self) {
        warn!(message = "Adapter has quit.");
        counter!("quit_total").increment(1);
    }
}

/// The gRPC server did not finish its in-flight streams within the limit.
#[derive(Debug)]
pub struct AdapterShutdownTimedOut {
    pub limit_secs: u64,
}

impl InternalEvent for AdapterShutdownTimedOut {
    fn emit(self) {
        warn!(
            message = "Open access log streams did not close in time. Aborting them.",
            limit_secs = self.limit_secs,
        );
    }
}
