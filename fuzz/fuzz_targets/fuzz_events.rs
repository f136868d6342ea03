#![no_main]

use libfuzzer_sys::fuzz_target;
use rylv_dogstatsd::{encode_event, EventFields, MetricsError, TagSet};

// Fuzz target for event header lengths and field escaping
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mid = (0..=text.len() / 2)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let (title, body) = text.split_at(mid);

    let fields = EventFields::new().hostname(body).priority(title);
    match encode_event(title, body, Some(&fields), &TagSet::new(), &[body]) {
        Ok(packet) => {
            let header_end = packet.find("}:").unwrap();
            let (title_len, body_len) = packet[3..header_end].split_once(',').unwrap();
            let title_len: usize = title_len.parse().unwrap();
            let body_len: usize = body_len.parse().unwrap();
            assert_eq!(title_len, title.replace('\n', "\\n").len());
            assert_eq!(body_len, body.replace('\n', "\\n").len());
        }
        Err(MetricsError::Validation(_)) => assert!(title.is_empty() || body.is_empty()),
        Err(err) => panic!("unexpected error: {err}"),
    }
});
