use prometheus::register_counter;
use prometheus::register_counter_vec;
use prometheus::{Counter, CounterVec};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUESTIONS_SERVED_CNTR: CounterVec = register_counter_vec!(
        "questions_served_total",
        "Number of questions returned to clients",
        &["endpoint"]
    )
    .unwrap();
    pub static ref QUIZ_ROUNDS_CNTR: Counter =
        register_counter!("quiz_rounds_total", "Number of quiz questions drawn").unwrap();
}

pub fn record_served(endpoint: &str, count: usize) {
    QUESTIONS_SERVED_CNTR
        .with_label_values(&[endpoint])
        .inc_by(count as f64);
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
