pub mod envoy_als;
