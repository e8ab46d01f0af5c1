use std::net::SocketAddr;

// ── Transport metrics (request-driven) ──────────────────────────

/// Counter: API calls issued. Labels: endpoint, status.
pub const REQUESTS_TOTAL: &str = "booker25_requests_total";

/// Histogram: API call latency in seconds. Labels: endpoint.
pub const REQUEST_DURATION_SECONDS: &str = "booker25_request_duration_seconds";

// ── Aggregation metrics ─────────────────────────────────────────

/// Counter: resources dropped because their merged timeline had no open slot.
pub const RESOURCES_PRUNED_CLOSED_TOTAL: &str = "booker25_resources_pruned_closed_total";

/// Counter: resources dropped by condition filters.
pub const RESOURCES_FILTERED_TOTAL: &str = "booker25_resources_filtered_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map an HTTP status to a short label for metrics.
pub fn status_label(status: Option<u16>) -> &'static str {
    match status {
        Some(200..=299) => "ok",
        Some(400..=499) => "client_error",
        Some(500..=599) => "server_error",
        Some(_) => "other",
        None => "transport_error",
    }
}
