//! Integration tests for telemetry initialization and span helpers.

#[test]
fn telemetry_initializes_without_endpoint() {
    // Note: tracing subscriber can only be set once per process.
    // Using try_init() in the implementation avoids panics if another
    // test already initialized a subscriber.
    let config = dispatch_rs::telemetry::TelemetryConfig {
        endpoint: None,
        service_name: "dispatch-test".to_string(),
        log_level: "debug".to_string(),
    };
    // This may return Err if a global subscriber was already set by
    // another test in this process; that is acceptable.
    let _guard = dispatch_rs::telemetry::init_telemetry(config);
}

#[test]
fn genai_chat_span_creates() {
    let _span =
        dispatch_rs::telemetry::genai::start_chat_span("claude-sonnet-4-20250514", "anthropic", 2000);
}

#[test]
fn cycle_span_records_result_and_commits() {
    let span = dispatch_rs::telemetry::dispatch::start_cycle_span("store", Some("3f2a9c1e"));
    dispatch_rs::telemetry::dispatch::record_cycle_result(&span, "fallback", 3);
    dispatch_rs::telemetry::dispatch::record_commit(&span, "J-1001", "created");
}
