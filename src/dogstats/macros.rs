/// Sends a histogram value through a [`Client`](crate::Client) with a variable number of tags.
///
/// Tags can be anything that implements `AsRef<str>`, so literals and owned
/// strings can be mixed. The macro evaluates to the client's `MetricResult<()>`.
///
/// # Examples
///
/// ```no_run
/// use rylv_dogstatsd::{histogram, Client};
///
/// let client = Client::new_default()?;
///
/// // With static string tags
/// histogram!(client, "request.duration", 100, "endpoint:api", "method:get")?;
///
/// // With mixed static and owned string tags
/// histogram!(client, "response.size", 1024, "service:web", format!("status:{}", 200))?;
///
/// // With no tags
/// histogram!(client, "memory.usage", 512)?;
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
#[macro_export]
macro_rules! histogram {
    // With tags
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.histogram($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr, $value:expr) => {
        $client.histogram($metric, $value, $crate::NO_TAGS)
    };
}

/// Adds a value to a counter with a variable number of tags.
///
/// # Examples
///
/// ```no_run
/// use rylv_dogstatsd::{count, Client};
///
/// let client = Client::new_default()?;
///
/// count!(client, "bytes.sent", 1024, "endpoint:api")?;
/// count!(client, "events.total", 5)?;
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
#[macro_export]
macro_rules! count {
    // With tags
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.count($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr, $value:expr) => {
        $client.count($metric, $value, $crate::NO_TAGS)
    };
}

/// Increments a counter by one with a variable number of tags.
///
/// # Examples
///
/// ```no_run
/// use rylv_dogstatsd::{incr, Client};
///
/// let client = Client::new_default()?;
///
/// incr!(client, "requests.total", "endpoint:api", "method:get")?;
/// incr!(client, "heartbeat")?;
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
#[macro_export]
macro_rules! incr {
    // With tags
    ($client:expr, $metric:expr $(, $tag:expr)+) => {
        $client.incr($metric, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr) => {
        $client.incr($metric, $crate::NO_TAGS)
    };
}

/// Decrements a counter by one with a variable number of tags.
///
/// # Examples
///
/// ```no_run
/// use rylv_dogstatsd::{decr, Client};
///
/// let client = Client::new_default()?;
///
/// decr!(client, "connections.open", "pool:main")?;
/// decr!(client, "workers")?;
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
#[macro_export]
macro_rules! decr {
    // With tags
    ($client:expr, $metric:expr $(, $tag:expr)+) => {
        $client.decr($metric, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr) => {
        $client.decr($metric, $crate::NO_TAGS)
    };
}

/// Records a gauge value with a variable number of tags.
///
/// # Examples
///
/// ```no_run
/// use rylv_dogstatsd::{gauge, Client};
///
/// let client = Client::new_default()?;
///
/// gauge!(client, "connections.active", 42, "pool:main")?;
/// gauge!(client, "memory.usage", 512.5)?;
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
#[macro_export]
macro_rules! gauge {
    // With tags
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.gauge($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr, $value:expr) => {
        $client.gauge($metric, $value, $crate::NO_TAGS)
    };
}

/// Records a timing in milliseconds with a variable number of tags.
#[macro_export]
macro_rules! timing {
    // With tags
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.timing($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr, $value:expr) => {
        $client.timing($metric, $value, $crate::NO_TAGS)
    };
}

/// Records a set value with a variable number of tags.
#[macro_export]
macro_rules! set {
    // With tags
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.set($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr, $value:expr) => {
        $client.set($metric, $value, $crate::NO_TAGS)
    };
}
