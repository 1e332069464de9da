use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "service_registry_operations_total",
        "Registry operations by outcome",
        &["operation", "outcome"]
    )
    .expect("register operations_total")
});

/// Count one registry call, labelled `ok` or with the error code.
pub fn track<T>(operation: &'static str, res: Result<T, ServiceError>) -> Result<T, ServiceError> {
    let outcome = match &res {
        Ok(_) => "ok",
        Err(e) => e.code(),
    };
    OPERATIONS_TOTAL.with_label_values(&[operation, outcome]).inc();
    res
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_counts_by_outcome() {
        let before = OPERATIONS_TOTAL.with_label_values(&["unit_test_op", "service_not_found"]).get();
        let _ = track::<()>("unit_test_op", Err(ServiceError::not_found("x")));
        let _ = track("unit_test_op", Ok(1));
        assert_eq!(OPERATIONS_TOTAL.with_label_values(&["unit_test_op", "service_not_found"]).get(), before + 1);
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("service_registry_operations_total"));
    }
}
