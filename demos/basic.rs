//! Basic usage of every metric type through the synchronous client.
//!
//! Run with: `cargo run --example basic`

use rylv_dogstatsd::{Client, ClientOptions, MetricType, MetricsError, NO_TAGS};

fn main() -> Result<(), MetricsError> {
    let options = ClientOptions {
        namespace: "myapp".to_string(),
        tags: vec!["env:dev".to_string()],
        ..ClientOptions::default()
    };
    let client = Client::with_options(options)?;

    // Histogram: distribution of values, computed by the agent
    client.histogram("request.size", 512, &["endpoint:api", "method:get"])?;

    // Timing: milliseconds, floats keep their precision
    client.timing("request.latency", 42.125, &["endpoint:api"])?;

    // Counter: arbitrary increments, plus the +1/-1 helpers
    client.count("bytes.sent", 1024, &["endpoint:api"])?;
    client.incr("request.count", NO_TAGS)?;
    client.decr("workers.idle", NO_TAGS)?;

    // Gauge: point-in-time value
    client.gauge("connections.active", 100, &["pool:main"])?;

    // Set: unique occurrences
    client.set("users.unique", 4711, NO_TAGS)?;

    // Sample rate is passed through to the agent
    client.send("cache.hit", MetricType::Count, 1, 0.1, NO_TAGS)?;

    client.close()?;
    println!("All metric types sent.");
    Ok(())
}
