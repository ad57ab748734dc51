use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_placed_total: IntCounterVec,
    pub order_transitions_total: IntCounterVec,
    pub order_distance_km: Histogram,
    pub order_cost: Histogram,
    pub vehicles_registered: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_placed_total = IntCounterVec::new(
            Opts::new("orders_placed_total", "Orders placed by package size and speed"),
            &["size", "speed"],
        )
        .expect("valid orders_placed_total metric");

        let order_transitions_total = IntCounterVec::new(
            Opts::new(
                "order_transitions_total",
                "Order lifecycle transitions by resulting status",
            ),
            &["status"],
        )
        .expect("valid order_transitions_total metric");

        let order_distance_km = Histogram::with_opts(
            HistogramOpts::new("order_distance_km", "Great-circle distance of placed orders")
                .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 5000.0]),
        )
        .expect("valid order_distance_km metric");

        let order_cost = Histogram::with_opts(
            HistogramOpts::new("order_cost", "Quoted cost of placed orders")
                .buckets(prometheus::exponential_buckets(50.0, 4.0, 10).expect("valid buckets")),
        )
        .expect("valid order_cost metric");

        let vehicles_registered =
            IntGauge::new("vehicles_registered", "Vehicles currently registered")
                .expect("valid vehicles_registered metric");

        registry
            .register(Box::new(orders_placed_total.clone()))
            .expect("register orders_placed_total");
        registry
            .register(Box::new(order_transitions_total.clone()))
            .expect("register order_transitions_total");
        registry
            .register(Box::new(order_distance_km.clone()))
            .expect("register order_distance_km");
        registry
            .register(Box::new(order_cost.clone()))
            .expect("register order_cost");
        registry
            .register(Box::new(vehicles_registered.clone()))
            .expect("register vehicles_registered");

        Self {
            registry,
            orders_placed_total,
            order_transitions_total,
            order_distance_km,
            order_cost,
            vehicles_registered,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
