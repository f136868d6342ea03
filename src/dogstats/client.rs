use std::borrow::Cow;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, trace};

use super::encoder::{encode_event, encode_metric, EventFields, MetricType, MetricValue};
use super::guard::guard;
use super::options::ClientOptions;
use super::tags::TagSet;
use super::writer::{UdpSocketWriter, Writer};
use crate::{MetricResult, MetricsError};

/// Namespace and instance tags of a client.
///
/// Setters publish a new snapshot; every send encodes against the snapshot
/// that is current when it runs and never writes back into it.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClientState {
    pub namespace: String,
    pub tags: TagSet,
}

/// One metric or event, borrowed for inline sends and owned for scheduled ones.
#[derive(Debug, Clone)]
pub(crate) enum Request<'a> {
    Metric {
        name: Cow<'a, str>,
        metric_type: MetricType,
        value: MetricValue,
        sample_rate: f64,
        tags: Vec<Cow<'a, str>>,
    },
    Event {
        title: Cow<'a, str>,
        text: Cow<'a, str>,
        fields: Option<Cow<'a, EventFields>>,
        tags: Vec<Cow<'a, str>>,
    },
}

impl<'a> Request<'a> {
    pub fn metric<T: AsRef<str>>(
        name: &'a str,
        metric_type: MetricType,
        value: MetricValue,
        sample_rate: f64,
        tags: &'a [T],
    ) -> Self {
        Self::Metric {
            name: Cow::Borrowed(name),
            metric_type,
            value,
            sample_rate,
            tags: borrow_tags(tags),
        }
    }

    pub fn event<T: AsRef<str>>(
        title: &'a str,
        text: &'a str,
        fields: Option<&'a EventFields>,
        tags: &'a [T],
    ) -> Self {
        Self::Event {
            title: Cow::Borrowed(title),
            text: Cow::Borrowed(text),
            fields: fields.map(Cow::Borrowed),
            tags: borrow_tags(tags),
        }
    }

    pub fn into_owned(self) -> Request<'static> {
        match self {
            Self::Metric {
                name,
                metric_type,
                value,
                sample_rate,
                tags,
            } => Request::Metric {
                name: Cow::Owned(name.into_owned()),
                metric_type,
                value,
                sample_rate,
                tags: own_tags(tags),
            },
            Self::Event {
                title,
                text,
                fields,
                tags,
            } => Request::Event {
                title: Cow::Owned(title.into_owned()),
                text: Cow::Owned(text.into_owned()),
                fields: fields.map(|f| Cow::Owned(f.into_owned())),
                tags: own_tags(tags),
            },
        }
    }

    fn encode(&self, state: &ClientState) -> MetricResult<String> {
        match self {
            Self::Metric {
                name,
                metric_type,
                value,
                sample_rate,
                tags,
            } => {
                if !value.is_finite() {
                    return Err(MetricsError::validation(format!(
                        "value of {name} must be finite, got {value:?}"
                    )));
                }
                if !sample_rate.is_finite() {
                    return Err(MetricsError::validation(format!(
                        "sample rate of {name} must be finite, got {sample_rate}"
                    )));
                }
                Ok(encode_metric(
                &state.namespace,
                &state.tags,
                name,
                *metric_type,
                *value,
                *sample_rate,
                tags,
            ))
            }
            Self::Event {
                title,
                text,
                fields,
                tags,
            } => encode_event(title, text, fields.as_deref(), &state.tags, tags),
        }
    }
}

fn borrow_tags<T: AsRef<str>>(tags: &[T]) -> Vec<Cow<'_, str>> {
    tags.iter().map(|t| Cow::Borrowed(t.as_ref())).collect()
}

fn own_tags(tags: Vec<Cow<'_, str>>) -> Vec<Cow<'static, str>> {
    tags.into_iter()
        .map(|t| Cow::Owned(t.into_owned()))
        .collect()
}

/// Synchronous `DogStatsD` client.
///
/// Every send encodes one packet, checks it against the size limit and writes
/// it to the transport on the calling thread, returning any error. Nothing is
/// sent when encoding or the size check fails.
///
/// Namespace and tags are changed only through the setters. They can be called
/// while sends are in flight on other threads; which state such a send picks up
/// is unspecified, so set them before spawning concurrent sends if it matters.
///
/// # Example
///
/// ```no_run
/// use rylv_dogstatsd::{Client, NO_TAGS};
///
/// let client = Client::new("127.0.0.1", 8125, false)?;
/// client.set_namespace("myapp");
/// client.add_tag("env:prod");
///
/// client.incr("requests", &["endpoint:api"])?;
/// client.gauge("connections", 42, NO_TAGS)?;
/// client.timing("request.latency", 12.5, NO_TAGS)?;
/// client.close()?;
/// # Ok::<(), rylv_dogstatsd::MetricsError>(())
/// ```
pub struct Client<W = UdpSocketWriter> {
    writer: W,
    state: ArcSwap<ClientState>,
    max_packet_size: usize,
    auto_truncate: bool,
}

impl Client<UdpSocketWriter> {
    /// Creates a client sending to `host:port` over UDP.
    ///
    /// # Errors
    /// Returns an error if the address cannot be resolved or the socket cannot be bound.
    pub fn new(host: &str, port: u16, auto_truncate: bool) -> MetricResult<Self> {
        Self::with_options(ClientOptions::new(host, port, auto_truncate))
    }

    /// Creates a client for the local agent with [`ClientOptions::default`].
    ///
    /// # Errors
    /// Returns an error if the socket cannot be bound.
    pub fn new_default() -> MetricResult<Self> {
        Self::with_options(ClientOptions::default())
    }

    /// Creates a UDP client from `options`.
    ///
    /// # Errors
    /// Returns an error if the address cannot be resolved or the socket cannot be bound.
    pub fn with_options(options: ClientOptions) -> MetricResult<Self> {
        let writer = UdpSocketWriter::connect(&options.host, options.port)?;
        debug!(
            "dogstatsd client sending to {} (auto_truncate: {})",
            writer.destination(),
            options.auto_truncate
        );
        Ok(Self::with_writer(writer, options))
    }
}

impl<W: Writer> Client<W> {
    /// Creates a client writing to a custom transport. `host` and `port` of
    /// `options` are ignored.
    #[must_use]
    pub fn with_writer(writer: W, options: ClientOptions) -> Self {
        let state = ClientState {
            namespace: options.namespace,
            tags: options.tags.into_iter().collect(),
        };
        Self {
            writer,
            state: ArcSwap::from_pointee(state),
            max_packet_size: options.max_packet_size,
            auto_truncate: options.auto_truncate,
        }
    }

    /// Sets the namespace prepended to every metric name.
    pub fn set_namespace(&self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        self.update_state(|state| state.namespace.clone_from(&namespace));
    }

    /// Adds a tag sent with every metric and event, unless already present.
    /// Returns the resulting tags.
    pub fn add_tag(&self, tag: impl AsRef<str>) -> Vec<String> {
        let tag = tag.as_ref();
        self.update_state(|state| {
            state.tags.add(tag);
        })
        .tags
        .as_slice()
        .to_vec()
    }

    /// Adds several tags in order, skipping those already present.
    /// Returns the resulting tags.
    pub fn add_tags<I>(&self, tags: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tags: Vec<String> = tags.into_iter().map(|t| t.as_ref().to_owned()).collect();
        self.update_state(|state| {
            state.tags.add_all(&tags);
        })
        .tags
        .as_slice()
        .to_vec()
    }

    /// Current namespace.
    #[must_use]
    pub fn namespace(&self) -> String {
        self.state.load().namespace.clone()
    }

    /// Current instance tags, in insertion order.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.state.load().tags.as_slice().to_vec()
    }

    /// Whether oversized packets are truncated instead of rejected.
    #[must_use]
    pub const fn auto_truncate(&self) -> bool {
        self.auto_truncate
    }

    /// Maximum packet size in bytes.
    #[must_use]
    pub const fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    /// The underlying transport.
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Sends a metric of any type.
    ///
    /// `sample_rate` is passed through to the agent; it does not suppress sends.
    ///
    /// # Errors
    /// Returns [`crate::MetricsError::Validation`] if `value` or `sample_rate`
    /// is infinite or `NaN`, [`crate::MetricsError::PacketTooLarge`] if the
    /// packet is over the limit and auto-truncate is off, or
    /// [`crate::MetricsError::Transport`] if the write fails.
    pub fn send<T: AsRef<str>>(
        &self,
        stat: &str,
        metric_type: MetricType,
        value: impl Into<MetricValue>,
        sample_rate: f64,
        tags: &[T],
    ) -> MetricResult<()> {
        self.dispatch(&Request::metric(
            stat,
            metric_type,
            value.into(),
            sample_rate,
            tags,
        ))
    }

    /// Adds `count` to a counter.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn count<T: AsRef<str>>(
        &self,
        stat: &str,
        count: impl Into<MetricValue>,
        tags: &[T],
    ) -> MetricResult<()> {
        self.send(stat, MetricType::Count, count, 1.0, tags)
    }

    /// Increments a counter by one.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn incr<T: AsRef<str>>(&self, stat: &str, tags: &[T]) -> MetricResult<()> {
        self.send(stat, MetricType::Count, 1, 1.0, tags)
    }

    /// Decrements a counter by one.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn decr<T: AsRef<str>>(&self, stat: &str, tags: &[T]) -> MetricResult<()> {
        self.send(stat, MetricType::Count, -1, 1.0, tags)
    }

    /// Records a gauge value.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn gauge<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
    ) -> MetricResult<()> {
        self.send(stat, MetricType::Gauge, value, 1.0, tags)
    }

    /// Records a histogram value.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn histogram<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
    ) -> MetricResult<()> {
        self.send(stat, MetricType::Histogram, value, 1.0, tags)
    }

    /// Records a timing in milliseconds.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn timing<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
    ) -> MetricResult<()> {
        self.send(stat, MetricType::Timing, value, 1.0, tags)
    }

    /// Records a value for unique-count tracking.
    ///
    /// # Errors
    /// See [`Client::send`].
    pub fn set<T: AsRef<str>>(
        &self,
        stat: &str,
        value: impl Into<MetricValue>,
        tags: &[T],
    ) -> MetricResult<()> {
        self.send(stat, MetricType::Set, value, 1.0, tags)
    }

    /// Sends an event. Events are not namespaced.
    ///
    /// # Errors
    /// Returns [`crate::MetricsError::Validation`] if `title` or `text` is empty,
    /// otherwise the same errors as [`Client::send`].
    pub fn event<T: AsRef<str>>(
        &self,
        title: &str,
        text: &str,
        fields: Option<&EventFields>,
        tags: &[T],
    ) -> MetricResult<()> {
        self.dispatch(&Request::event(title, text, fields, tags))
    }

    /// Releases the transport.
    ///
    /// # Errors
    /// Returns the transport's error if closing fails.
    pub fn close(self) -> MetricResult<()> {
        debug!("closing dogstatsd client");
        self.writer.close()?;
        Ok(())
    }

    /// Encodes, guards and writes a single packet.
    pub(crate) fn dispatch(&self, request: &Request<'_>) -> MetricResult<()> {
        let packet = request.encode(&self.state.load())?;
        let packet = guard(packet.as_bytes(), self.max_packet_size, self.auto_truncate)?;
        trace!("sending {} byte packet", packet.len());
        self.writer.write(packet)?;
        Ok(())
    }

    fn update_state(&self, update: impl Fn(&mut ClientState)) -> Arc<ClientState> {
        let mut published = self.state.load_full();
        self.state.rcu(|current| {
            let mut next = ClientState::clone(current);
            update(&mut next);
            published = Arc::new(next);
            Arc::clone(&published)
        });
        published
    }
}

impl<W> std::fmt::Debug for Client<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("Client")
            .field("namespace", &state.namespace)
            .field("tags", &state.tags)
            .field("max_packet_size", &self.max_packet_size)
            .field("auto_truncate", &self.auto_truncate)
            .finish_non_exhaustive()
    }
}
