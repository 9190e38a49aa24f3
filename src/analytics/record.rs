use serde::{Deserialize, Serialize};

/// Reported as the `gateway_source` of every record built from Envoy logs.
pub const GATEWAY_SOURCE: &str = "envoy";

/// One normalized API analytics record, produced per proxied exchange.
///
/// Timestamps are milliseconds since the Unix epoch, `0` when unknown.
/// Header-derived fields are raw pass-through values. Normalizing them, and
/// filling `record_type` or `gateway_flow_id`, is left to the delivery side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub client_received_start_timestamp: i64,
    pub client_received_end_timestamp: i64,
    pub client_sent_start_timestamp: i64,
    pub client_sent_end_timestamp: i64,
    pub target_received_start_timestamp: i64,
    pub target_received_end_timestamp: i64,
    pub target_sent_start_timestamp: i64,
    pub target_sent_end_timestamp: i64,
    pub record_type: String,
    pub api_proxy: String,
    pub request_uri: String,
    pub request_path: String,
    pub request_verb: String,
    pub client_ip: String,
    pub user_agent: String,
    pub api_proxy_revision: i32,
    pub response_status_code: u32,
    pub developer_email: String,
    pub developer_app: String,
    pub access_token: String,
    pub client_id: String,
    /// Comma separated, as received.
    pub api_product: String,
    /// Space separated, as received.
    pub scope: String,
    pub organization: String,
    pub environment: String,
    pub gateway_source: String,
    pub gateway_flow_id: String,
}
