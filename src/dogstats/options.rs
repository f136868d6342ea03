use super::guard::MAX_PACKET_SIZE;

/// Host of the local agent used by [`ClientOptions::default`].
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port of the local agent used by [`ClientOptions::default`].
pub const DEFAULT_PORT: u16 = 8125;

/// Configuration for a [`crate::Client`] or [`crate::AsyncClient`].
///
/// All values are fixed once the client is built, except the namespace and
/// tags which can be changed later through the client's setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Agent host name or address.
    pub host: String,
    /// Agent UDP port.
    pub port: u16,
    /// Cut oversized packets to `max_packet_size` instead of failing the call.
    pub auto_truncate: bool,
    /// Maximum size of a single packet in bytes.
    pub max_packet_size: usize,
    /// Prefix joined to every metric name with a `.`. Empty for none.
    pub namespace: String,
    /// Tags attached to every metric and event.
    pub tags: Vec<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            auto_truncate: false,
            max_packet_size: MAX_PACKET_SIZE,
            namespace: String::new(),
            tags: Vec::new(),
        }
    }
}

impl ClientOptions {
    /// Options pointing at `host:port`, everything else default.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, auto_truncate: bool) -> Self {
        Self {
            host: host.into(),
            port,
            auto_truncate,
            ..Self::default()
        }
    }
}
