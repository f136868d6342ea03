#![no_main]

use libfuzzer_sys::fuzz_target;
use rylv_dogstatsd::{encode_metric, merge_tags, MetricType, TagSet};

// Fuzz target focusing on tag de-duplication and separator stripping
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Split the data into chunks to create multiple tags
    let text = String::from_utf8_lossy(data);
    let tags: Vec<&str> = text.split(',').collect();

    let mut instance = TagSet::new();
    instance.add_all(tags.iter().take(tags.len() / 2));
    let call = &tags[tags.len() / 2..];

    let merged = merge_tags(&instance, call);
    for (i, tag) in merged.iter().enumerate() {
        assert!(!merged[..i].contains(tag), "duplicate tag {tag:?}");
    }

    let packet = encode_metric("fuzz", &instance, "fuzz.metric", MetricType::Count, 1.into(), 1.0, call);
    if let Some((_, tag_segment)) = packet.split_once("|#") {
        assert!(!tag_segment.contains('|'));
    }
});
