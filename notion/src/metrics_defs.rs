//! Metrics definitions for the Notion client.

use shared::metrics_defs::{MetricDef, MetricType};

pub const STORE_REQUEST_DURATION: MetricDef = MetricDef {
    name: "store.request.duration",
    metric_type: MetricType::Histogram,
    description: "Duration of a Notion API call in seconds. Tagged with operation, outcome.",
};

pub const ALL_METRICS: &[MetricDef] = &[STORE_REQUEST_DURATION];
