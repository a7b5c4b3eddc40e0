use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "Request duration in seconds. Tagged with endpoint, status.",
};

pub const TAG_LOOKUP_MISS: MetricDef = MetricDef {
    name: "tag_lookup.miss",
    metric_type: MetricType::Counter,
    description: "Tag lookups that failed or found no tag. Tagged with tag.",
};

pub const CONTACTS_RETURNED: MetricDef = MetricDef {
    name: "contacts.returned",
    metric_type: MetricType::Histogram,
    description: "Number of contacts returned after filtering incomplete records",
};

pub const PROFILE_FIELDS_UPDATED: MetricDef = MetricDef {
    name: "profile.fields_updated",
    metric_type: MetricType::Histogram,
    description: "Number of properties set by a vendor profile submission",
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUEST_DURATION,
    TAG_LOOKUP_MISS,
    CONTACTS_RETURNED,
    PROFILE_FIELDS_UPDATED,
];
