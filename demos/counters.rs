//! Counter helpers and the tag macros.
//!
//! Run with: `cargo run --example counters`

use rylv_dogstatsd::{count, decr, incr, Client, MetricsError};

fn main() -> Result<(), MetricsError> {
    let client = Client::new_default()?;
    client.add_tags(["service:checkout", "region:eu"]);

    for status in [200, 200, 404, 500] {
        incr!(client, "http.requests", format!("status:{status}"))?;
    }

    count!(client, "bytes.received", 4096, "endpoint:upload")?;
    decr!(client, "queue.depth")?;

    println!("instance tags: {:?}", client.tags());
    client.close()
}
