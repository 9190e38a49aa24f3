//! Internal instrumentation.
//!
//! Every observable occurrence inside the adapter is modelled as a small
//! struct implementing [`InternalEvent`] and raised with [`emit!`]. Emitting
//! an event writes its log line and updates its metrics in one place, so the
//! call sites stay free of logging details.

mod analytics;
mod envoy_als;
pub(crate) mod prelude;
mod process;

pub use self::analytics::*;
pub use self::envoy_als::*;
pub use self::process::*;

/// An event raised by the adapter about itself.
pub trait InternalEvent: Sized {
    fn emit(self);
}

pub fn emit(event: impl InternalEvent) {
    event.emit();
}

#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::internal_events::emit($event)
    };
}
