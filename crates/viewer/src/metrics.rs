use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::time::Duration;

/// Instruments exported through the global meter. Without an installed
/// meter provider they are no-ops.
#[derive(Clone)]
pub struct ViewerMetrics {
    renders: Counter<u64>,
    primitives: Counter<u64>,
    render_duration: Histogram<f64>,
    detections: Counter<u64>,
}

impl ViewerMetrics {
    pub fn new(meter_name: &'static str) -> Self {
        let meter = global::meter(meter_name);
        let latency_buckets = [
            0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.002, 0.005, 0.01, 0.05,
        ];

        Self {
            renders: meter
                .u64_counter("overlay_renders_total")
                .with_description("Overlay renders served")
                .build(),
            primitives: meter
                .u64_counter("overlay_primitives_total")
                .with_description("Primitives produced across all renders")
                .build(),
            render_duration: meter
                .f64_histogram("overlay_render_duration_seconds")
                .with_description("Time to filter and project one overlay")
                .with_unit("s")
                .with_boundaries(latency_buckets.to_vec())
                .build(),
            detections: meter
                .u64_counter("overlay_detections_cached_total")
                .with_description("Detections stored in the cache")
                .build(),
        }
    }

    pub fn record_render(&self, source: &'static str, primitives: usize, elapsed: Duration) {
        let attributes = [KeyValue::new("source", source)];
        self.renders.add(1, &attributes);
        self.primitives.add(primitives as u64, &attributes);
        self.render_duration
            .record(elapsed.as_secs_f64(), &attributes);
    }

    pub fn record_detections(&self, count: usize) {
        self.detections.add(count as u64, &[]);
    }
}
