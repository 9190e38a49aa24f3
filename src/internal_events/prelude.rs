/// Values for the `error_type` tag of `component_errors_total`.
pub(crate) mod error_type {
    /// A request or stream failed at the transport level.
    pub const REQUEST_FAILED: &str = "request_failed";
    /// A bounded operation did not complete in time.
    pub const TIMED_OUT: &str = "timed_out";
    /// Data could not be serialized.
    pub const ENCODER_FAILED: &str = "encoder_failed";
    /// Writing to an output failed.
    pub const WRITER_FAILED: &str = "writer_failed";
    /// A downstream component refused the data.
    pub const DELIVERY_FAILED: &str = "delivery_failed";
}

/// Values for the `stage` tag of `component_errors_total`.
pub(crate) mod error_stage {
    pub const RECEIVING: &str = "receiving";
    pub const PROCESSING: &str = "processing";
    pub const SENDING: &str = "sending";
}
