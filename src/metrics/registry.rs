use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    pub static ref ERRORS_TRANSLATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "errors_translated_total",
        "Total errors translated into responses",
        &["category", "status"]
    )
    .unwrap();

    pub static ref ERROR_SERIALIZATION_FALLBACKS_TOTAL: IntCounter = register_int_counter!(
        "error_serialization_fallbacks_total",
        "Total error responses sent as plain text because JSON encoding failed"
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&ERRORS_TRANSLATED_TOTAL);
    lazy_static::initialize(&ERROR_SERIALIZATION_FALLBACKS_TOTAL);
}
