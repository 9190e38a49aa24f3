use std::collections::HashMap;

use envoy_proto::envoy::{
    config::core::v3::RequestMethod, data::accesslog::v3::HttpAccessLogEntry,
};

use super::time::{timestamp_add_duration_millis, timestamp_millis};
use crate::{
    analytics::{AnalyticsRecord, GATEWAY_SOURCE},
    tenant::TenantContext,
};

pub const HEADER_API: &str = "x-apigee-api";
pub const HEADER_API_PRODUCTS: &str = "x-apigee-apiproducts";
pub const HEADER_ACCESS_TOKEN: &str = "x-apigee-accesstoken";
pub const HEADER_CLIENT_ID: &str = "x-apigee-clientid";
pub const HEADER_APPLICATION: &str = "x-apigee-application";
pub const HEADER_DEVELOPER_EMAIL: &str = "x-apigee-developeremail";
pub const HEADER_SCOPE: &str = "x-apigee-scope";
pub const HEADER_ORGANIZATION: &str = "x-apigee-organization";
pub const HEADER_ENVIRONMENT: &str = "x-apigee-environment";

/// Values the auth filter injects into the proxied request.
///
/// Multi-valued headers are kept as reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthHeaders {
    pub api: String,
    pub api_products: String,
    pub access_token: String,
    pub client_id: String,
    pub application: String,
    pub developer_email: String,
    pub scope: String,
    pub organization: String,
    pub environment: String,
}

impl AuthHeaders {
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        let get = |name: &str| headers.get(name).cloned().unwrap_or_default();
        Self {
            api: get(HEADER_API),
            api_products: get(HEADER_API_PRODUCTS),
            access_token: get(HEADER_ACCESS_TOKEN),
            client_id: get(HEADER_CLIENT_ID),
            application: get(HEADER_APPLICATION),
            developer_email: get(HEADER_DEVELOPER_EMAIL),
            scope: get(HEADER_SCOPE),
            organization: get(HEADER_ORGANIZATION),
            environment: get(HEADER_ENVIRONMENT),
        }
    }
}

/// Translates one HTTP access log entry into an analytics record.
///
/// Every source field is optional; missing data leaves the matching record
/// field zero or empty.
pub fn build_record(entry: HttpAccessLogEntry, tenant: &TenantContext) -> AnalyticsRecord {
    let common = entry.common_properties.unwrap_or_default();
    let request = entry.request.unwrap_or_default();
    let response = entry.response.unwrap_or_default();

    let start = common.start_time.as_ref();
    let offset =
        |dur: &Option<prost_types::Duration>| timestamp_add_duration_millis(start, dur.as_ref());
    let auth = AuthHeaders::from_headers(&request.request_headers);

    AnalyticsRecord {
        client_received_start_timestamp: timestamp_millis(start),
        client_received_end_timestamp: offset(&common.time_to_last_rx_byte),
        client_sent_start_timestamp: offset(&common.time_to_first_upstream_tx_byte),
        client_sent_end_timestamp: offset(&common.time_to_last_upstream_tx_byte),
        target_received_start_timestamp: offset(&common.time_to_first_upstream_rx_byte),
        target_received_end_timestamp: offset(&common.time_to_last_upstream_rx_byte),
        target_sent_start_timestamp: offset(&common.time_to_first_downstream_tx_byte),
        target_sent_end_timestamp: offset(&common.time_to_last_downstream_tx_byte),
        request_path: path_without_query(&request.path).to_owned(),
        request_verb: method_name(request.request_method),
        request_uri: request.path,
        client_ip: request.forwarded_for,
        user_agent: request.user_agent,
        response_status_code: response.response_code.unwrap_or(0),
        api_proxy: auth.api,
        api_product: auth.api_products,
        access_token: auth.access_token,
        client_id: auth.client_id,
        developer_app: auth.application,
        developer_email: auth.developer_email,
        scope: auth.scope,
        organization: tenant.organization().to_owned(),
        environment: tenant.environment().to_owned(),
        gateway_source: GATEWAY_SOURCE.to_owned(),
        ..Default::default()
    }
}

fn path_without_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(path, _)| path)
}

fn method_name(method: i32) -> String {
    RequestMethod::try_from(method)
        .map(|method| method.as_str_name().to_owned())
        .unwrap_or_else(|_| method.to_string())
}
