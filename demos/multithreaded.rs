//! Fire-and-forget sends from several threads, joined through a send group.
//!
//! Run with: `cargo run --example multithreaded`

use rylv_dogstatsd::{AsyncClient, MetricsError, SendGroup, NO_TAGS};
use std::sync::Arc;
use std::thread;

fn main() -> Result<(), MetricsError> {
    let client = Arc::new(AsyncClient::new_default()?);
    client.set_namespace("worker");
    let group = SendGroup::new();

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let client = Arc::clone(&client);
            let group = group.clone();
            thread::spawn(move || {
                for job in 0..100 {
                    client
                        .timing("job.duration", job % 17, &[format!("worker:{id}")], &group)
                        .spawn();
                }
                client.incr("jobs.done", NO_TAGS, &group).spawn();
            })
        })
        .collect();

    for worker in workers {
        let _ = worker.join();
    }
    group.wait();

    println!("pending: {}, failed: {}", group.pending(), group.failures());
    Ok(())
}
