//! Sending events with optional fields.
//!
//! Run with: `cargo run --example events`

use rylv_dogstatsd::{Client, EventFields, MetricsError, NO_TAGS};
use std::collections::HashMap;

fn main() -> Result<(), MetricsError> {
    let client = Client::new_default()?;

    client.event("deploy started", "rolling out\nversion 2", None, NO_TAGS)?;

    let fields = EventFields::new()
        .alert_type("success")
        .priority("low")
        .aggregation_key("deploy-2");
    client.event("deploy finished", "version 2 is live", Some(&fields), &["team:core"])?;

    // Fields can also come from a map; unknown keys are ignored
    let map = HashMap::from([("hostname", "web01"), ("color", "blue")]);
    client.event("host restarted", "kernel upgrade", Some(&EventFields::from(map)), NO_TAGS)?;

    if let Err(err) = client.event("", "no title", None, NO_TAGS) {
        println!("rejected: {err}");
    }

    client.close()
}
