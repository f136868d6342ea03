//! Plugging a custom transport in place of the UDP socket.
//!
//! Run with: `cargo run --example custom_writer`

use rylv_dogstatsd::{Client, ClientOptions, MetricsError, Writer, NO_TAGS};
use std::sync::Mutex;

/// Prints every packet instead of sending it.
#[derive(Default)]
struct StdoutWriter {
    written: Mutex<usize>,
}

impl Writer for StdoutWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        println!("{}", String::from_utf8_lossy(buf));
        *self.written.lock().map_err(|_| std::io::Error::other("poisoned"))? += 1;
        Ok(buf.len())
    }

    fn close(&self) -> std::io::Result<()> {
        let written = self.written.lock().map_err(|_| std::io::Error::other("poisoned"))?;
        println!("closing after {written} packets");
        Ok(())
    }
}

fn main() -> Result<(), MetricsError> {
    let options = ClientOptions {
        namespace: "demo".to_string(),
        max_packet_size: 48,
        auto_truncate: true,
        ..ClientOptions::default()
    };
    let client = Client::with_writer(StdoutWriter::default(), options);

    client.gauge("temperature", 21.5, &["room:kitchen"])?;
    client.incr("a.metric.with.a.name.long.enough.to.be.truncated", &["tag:value"])?;

    client.close()
}
