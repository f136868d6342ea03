use rylv_dogstatsd::{
    Client, ClientOptions, EventFields, MetricType, MetricsError, MAX_PACKET_SIZE, NO_TAGS,
};
use std::time::Duration;

use crate::support::{bind_listener, nothing_received, recv, recv_text};

fn many_tags() -> Vec<String> {
    // about 12 KiB of tags once joined
    (0..2098).map(|i| format!("t{i:04}")).collect()
}

#[test]
fn test_new_client_has_no_state() -> std::io::Result<()> {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = Client::new("127.0.0.1", port, false).unwrap();

    assert!(client.tags().is_empty());
    assert!(client.namespace().is_empty());
    assert!(!client.auto_truncate());
    assert_eq!(client.max_packet_size(), MAX_PACKET_SIZE);

    client
        .send("test.metric", MetricType::Count, 1, 1.0, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "test.metric:1|c");

    client.close().unwrap();
    Ok(())
}

#[test]
fn test_send_values_rates_namespace_and_tags() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = Client::new("127.0.0.1", port, false).unwrap();

    client
        .send("testing.metric", MetricType::Timing, 256.512, 1.0, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "testing.metric:256.512|ms");

    client
        .send("testing.metric", MetricType::Gauge, 5_536_650_702_696_i64, 1.0, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "testing.metric:5536650702696|g");

    client
        .send("testing.metric", MetricType::Timing, 256.512, 0.99, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "testing.metric:256.512|ms|@0.990000");

    client.set_namespace("godspeed");
    client
        .send("testing.metric", MetricType::Timing, 512.1024, 1.0, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "godspeed.testing.metric:512.1024|ms");

    client.add_tag("test");
    client
        .send("testing.metric", MetricType::Timing, 512.1024, 1.0, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "godspeed.testing.metric:512.1024|ms|#test");

    client.add_tag("test1");
    client.add_tags(["test2", "test3"]);
    client
        .send("testing.metric", MetricType::Timing, 512.1024, 1.0, &["test4", "test"])
        .unwrap();
    assert_eq!(
        recv_text(&listener),
        "godspeed.testing.metric:512.1024|ms|#test,test1,test2,test3,test4"
    );
}

#[test]
fn test_typed_helpers() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = Client::new("127.0.0.1", port, false).unwrap();

    client.count("test.count", 1, NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.count:1|c");

    client.incr("test.incr", NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.incr:1|c");

    client.decr("test.decr", NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.decr:-1|c");

    client.gauge("test.gauge", 42, NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.gauge:42|g");

    client.histogram("test.hist", 84, NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.hist:84|h");

    client.timing("test.timing", 2054, NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.timing:2054|ms");

    client.set("test.set", 10, NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "test.set:10|s");

    client.incr("test.incr", &["tag1", "tag2"]).unwrap();
    assert_eq!(recv_text(&listener), "test.incr:1|c|#tag1,tag2");
}

#[test]
fn test_events() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = Client::new("127.0.0.1", port, false).unwrap();

    client
        .event("some\nother event", "some body", None, NO_TAGS)
        .unwrap();
    assert_eq!(recv_text(&listener), "_e{18,9}:some\\nother event|some body");

    let fields = [
        ("date_happened", "1"),
        ("hostname", "2"),
        ("aggregation_key", "3"),
        ("priority", "4"),
        ("source_type_name", "5"),
        ("alert_type", "6"),
        ("bogus", "7"),
    ]
    .into_iter()
    .collect::<EventFields>();
    client.add_tags(["test0"]);
    client
        .event("a", "b\nc", Some(&fields), &["test1|x"])
        .unwrap();
    assert_eq!(
        recv_text(&listener),
        "_e{1,4}:a|b\\nc|d:1|h:2|k:3|p:4|s:5|t:6|#test0,test1x"
    );
}

#[test]
fn test_event_validation_sends_nothing() {
    let (listener, port) = bind_listener(Duration::from_millis(200));
    let client = Client::new("127.0.0.1", port, false).unwrap();

    match client.event("", "x", None, NO_TAGS) {
        Err(MetricsError::Validation(msg)) => assert!(msg.contains("title")),
        other => panic!("unexpected result: {other:?}"),
    }
    match client.event("x", "", None, NO_TAGS) {
        Err(MetricsError::Validation(msg)) => assert!(msg.contains("body")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(nothing_received(&listener));
}

#[test]
fn test_auto_truncate_sends_exactly_max_bytes() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = Client::new("127.0.0.1", port, true).unwrap();
    client.add_tags(many_tags());

    client
        .send("test.metric", MetricType::Count, 42, 1.0, NO_TAGS)
        .unwrap();

    let packet = recv(&listener);
    assert_eq!(packet.len(), MAX_PACKET_SIZE);
    assert!(packet.starts_with(b"test.metric:42|c|#t0000,t0001"));
}

#[test]
fn test_oversized_packet_rejected_without_auto_truncate() {
    let (listener, port) = bind_listener(Duration::from_millis(200));
    let client = Client::new("127.0.0.1", port, false).unwrap();
    client.add_tags(many_tags());

    match client.send("test.metric", MetricType::Count, 42, 1.0, NO_TAGS) {
        Err(MetricsError::PacketTooLarge { size, max }) => {
            assert!(size > MAX_PACKET_SIZE);
            assert_eq!(max, MAX_PACKET_SIZE);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(nothing_received(&listener));
}

#[test]
fn test_custom_packet_limit_from_options() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let options = ClientOptions {
        port,
        auto_truncate: true,
        max_packet_size: 10,
        ..ClientOptions::default()
    };
    let client = Client::with_options(options).unwrap();

    client.gauge("some.gauge.name", 1, NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "some.gauge");
}

#[test]
fn test_macros() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = Client::new("127.0.0.1", port, false).unwrap();
    let status = 200;

    rylv_dogstatsd::incr!(client, "m.incr").unwrap();
    assert_eq!(recv_text(&listener), "m.incr:1|c");

    rylv_dogstatsd::decr!(client, "m.decr", "a:b").unwrap();
    assert_eq!(recv_text(&listener), "m.decr:-1|c|#a:b");

    rylv_dogstatsd::count!(client, "m.count", 3, "a:b", format!("status:{status}")).unwrap();
    assert_eq!(recv_text(&listener), "m.count:3|c|#a:b,status:200");

    rylv_dogstatsd::gauge!(client, "m.gauge", 1.5).unwrap();
    assert_eq!(recv_text(&listener), "m.gauge:1.5|g");

    rylv_dogstatsd::histogram!(client, "m.hist", 7, "x").unwrap();
    assert_eq!(recv_text(&listener), "m.hist:7|h|#x");

    rylv_dogstatsd::timing!(client, "m.timing", 12).unwrap();
    assert_eq!(recv_text(&listener), "m.timing:12|ms");

    rylv_dogstatsd::set!(client, "m.set", 99, String::from("user:1")).unwrap();
    assert_eq!(recv_text(&listener), "m.set:99|s|#user:1");
}
