//! Generated protobuf types and gRPC service bindings for Envoy's access log
//! service (`envoy.service.accesslog.v3`).
//!
//! Only the subset of the Envoy schema that the adapter reads is modelled.
//! Field numbers follow upstream Envoy, so unmodelled fields sent by a real
//! Envoy are skipped on decode.

#![allow(clippy::all)]
#![allow(missing_docs)]

pub mod envoy {
    pub mod config {
        pub mod core {
            pub mod v3 {
                include!(concat!(env!("OUT_DIR"), "/envoy.config.core.v3.rs"));
            }
        }
    }

    pub mod data {
        pub mod accesslog {
            pub mod v3 {
                include!(concat!(env!("OUT_DIR"), "/envoy.data.accesslog.v3.rs"));
            }
        }
    }

    pub mod service {
        pub mod accesslog {
            pub mod v3 {
                include!(concat!(env!("OUT_DIR"), "/envoy.service.accesslog.v3.rs"));
            }
        }
    }
}
