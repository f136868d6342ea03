#![no_main]

use libfuzzer_sys::fuzz_target;
use rylv_dogstatsd::{Client, ClientOptions, MetricsError, Writer, NO_TAGS};
use std::sync::Mutex;

#[derive(Default)]
struct LastPacket(Mutex<Option<usize>>);

impl Writer for LastPacket {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        *self.0.lock().unwrap() = Some(buf.len());
        Ok(buf.len())
    }
}

// Fuzz target focusing on packet size limits and truncation
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // Use first 2 bytes to determine packet size (within reasonable limits)
    let packet_size = u16::from_le_bytes([data[0], data[1]]);
    let packet_size = usize::from((packet_size % 8192).max(16));
    let auto_truncate = data[2] % 2 == 0;

    let options = ClientOptions {
        max_packet_size: packet_size,
        auto_truncate,
        ..ClientOptions::default()
    };
    let client = Client::with_writer(LastPacket::default(), options);

    let metric_base = String::from_utf8_lossy(&data[3..]);
    let tags: Vec<String> = (0..20).map(|i| format!("tag{i}:{metric_base}")).collect();

    match client.gauge(&format!("test.metric.{metric_base}"), 1, &tags) {
        Ok(()) => {
            let written = client.writer().0.lock().unwrap().take().unwrap();
            assert!(written <= packet_size);
        }
        Err(MetricsError::PacketTooLarge { size, max }) => {
            assert!(!auto_truncate);
            assert!(size > max);
            assert!(client.writer().0.lock().unwrap().is_none());
        }
        Err(err) => panic!("unexpected error: {err}"),
    }
    let _ = client.incr("fuzz.incr", NO_TAGS);
});
