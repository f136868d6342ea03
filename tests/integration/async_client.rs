use rylv_dogstatsd::{AsyncClient, EventFields, MetricType, SendGroup, NO_TAGS};
use std::time::Duration;

use crate::support::{bind_listener, nothing_received, recv_sorted, recv_text};

fn warm_up(client: &AsyncClient) {
    client.set_namespace("godspeed");
    client.add_tags(["test0", "test1"]);
}

#[test]
fn test_async_basic_functionality() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = AsyncClient::new("127.0.0.1", port, false).unwrap();
    client.add_tag("test0");
    client.set_namespace("godspeed");

    let group = client.group();
    client
        .send("test.metric", MetricType::Count, 1, 1.0, &["test1", "test2"], group)
        .spawn();
    group.wait();

    assert_eq!(recv_text(&listener), "godspeed.test.metric:1|c|#test0,test1,test2");
    client.close().unwrap();
}

#[test]
fn test_async_setters() {
    let (_listener, port) = bind_listener(Duration::from_secs(2));
    let client = AsyncClient::new("127.0.0.1", port, false).unwrap();

    assert_eq!(client.add_tag("testing0"), ["testing0"]);
    assert_eq!(
        client.add_tags(["testing1", "testing2"]),
        ["testing0", "testing1", "testing2"]
    );
    client.set_namespace("heckman");
    assert_eq!(client.namespace(), "heckman");
    assert_eq!(client.client().namespace(), "heckman");
}

#[test]
fn test_async_typed_helpers() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = AsyncClient::new("127.0.0.1", port, false).unwrap();
    warm_up(&client);
    let extra = ["test8", "test9"];

    let group = SendGroup::new();
    client.count("test.count", 1, &extra, &group).spawn();
    client.incr("test.incr", &extra, &group).spawn();
    client.decr("test.decr", &extra, &group).spawn();
    client.gauge("test.gauge", 42, &extra, &group).spawn();
    client.histogram("test.hist", 84, &extra, &group).spawn();
    client.timing("test.timing", 2054, &extra, &group).spawn();
    client.set("test.set", 10, &extra, &group).spawn();
    client
        .event("test event", "body", Some(&EventFields::new().priority("low")), &extra, &group)
        .spawn();
    group.wait();
    assert_eq!(group.failures(), 0);

    // scheduled sends have no ordering guarantee
    let tags = "#test0,test1,test8,test9";
    let mut expected = vec![
        format!("godspeed.test.count:1|c|{tags}"),
        format!("godspeed.test.incr:1|c|{tags}"),
        format!("godspeed.test.decr:-1|c|{tags}"),
        format!("godspeed.test.gauge:42|g|{tags}"),
        format!("godspeed.test.hist:84|h|{tags}"),
        format!("godspeed.test.timing:2054|ms|{tags}"),
        format!("godspeed.test.set:10|s|{tags}"),
        format!("_e{{10,4}}:test event|body|p:low|{tags}"),
    ];
    expected.sort();
    assert_eq!(recv_sorted(&listener, expected.len()), expected);
}

#[test]
fn test_async_errors_stay_in_the_task() {
    let (listener, port) = bind_listener(Duration::from_millis(200));
    let client = AsyncClient::new("127.0.0.1", port, false).unwrap();
    client.add_tags((0..2098).map(|i| format!("t{i:04}")));

    let group = SendGroup::new();
    client.gauge("too.big", 1, NO_TAGS, &group).spawn();
    client.event("", "empty title", None, NO_TAGS, &group).spawn();
    group.wait();

    assert_eq!(group.pending(), 0);
    assert_eq!(group.failures(), 2);
    assert!(nothing_received(&listener));
}

#[test]
fn test_async_auto_truncate() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = AsyncClient::new("127.0.0.1", port, true).unwrap();
    client.add_tags((0..2098).map(|i| format!("t{i:04}")));

    let group = client.group();
    client.gauge("too.big", 1, NO_TAGS, group).spawn();
    client.wait();

    assert_eq!(group.failures(), 0);
    let mut buf = [0; 10000];
    let (n, _) = listener.recv_from(&mut buf).unwrap();
    assert_eq!(n, rylv_dogstatsd::MAX_PACKET_SIZE);
}

#[test]
fn test_inline_run_and_shared_client() {
    let (listener, port) = bind_listener(Duration::from_secs(2));
    let client = AsyncClient::new("127.0.0.1", port, false).unwrap();

    let group = SendGroup::new();
    let task = client.incr("inline", NO_TAGS, &group);
    assert_eq!(group.pending(), 1);
    task.run();
    assert_eq!(group.pending(), 0);
    assert_eq!(recv_text(&listener), "inline:1|c");

    // the synchronous client shares transport and state
    client.set_namespace("shared");
    client.client().incr("sync", NO_TAGS).unwrap();
    assert_eq!(recv_text(&listener), "shared.sync:1|c");
}
