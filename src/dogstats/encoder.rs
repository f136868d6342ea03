//! Wire-format encoding for metrics and events.
//!
//! Everything here is pure: the functions take the namespace and instance tags
//! of a client plus the call-site arguments and return the packet bytes.
//! Size limits are enforced afterwards by [`super::guard`].
//!
//! ```text
//! [namespace.]name:value|type[|@rate][|#tag,...]
//! _e{title_len,text_len}:title|text[|d:..|h:..|k:..|p:..|s:..|t:..][|#tag,...]
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write};

use super::tags::{merge_tags, TagSet};
use crate::{MetricResult, MetricsError};

/// The `DogStatsD` metric types and their wire markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    /// `c`
    Count,
    /// `g`
    Gauge,
    /// `ms`
    Timing,
    /// `h`
    Histogram,
    /// `s`
    Set,
}

impl MetricType {
    /// The marker written after the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "c",
            Self::Gauge => "g",
            Self::Timing => "ms",
            Self::Histogram => "h",
            Self::Set => "s",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric value in its natural numeric form.
///
/// Integers render without a decimal point. Floats render with the shortest
/// representation that round-trips, so `256.512` stays `256.512` and `42.0`
/// becomes `42`.
///
/// The agent cannot parse `inf` or `NaN`, so clients reject non-finite floats
/// with [`MetricsError::Validation`] before encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// A signed integer value.
    Int(i64),
    /// An unsigned integer value.
    UInt(u64),
    /// A floating point value.
    Float(f64),
}

impl MetricValue {
    /// `false` only for infinite or `NaN` floats.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        match self {
            Self::Int(_) | Self::UInt(_) => true,
            Self::Float(v) => v.is_finite(),
        }
    }

    fn write_to(self, buf: &mut String) {
        match self {
            Self::Int(v) => buf.push_str(itoa::Buffer::new().format(v)),
            Self::UInt(v) => buf.push_str(itoa::Buffer::new().format(v)),
            // writing into a String cannot fail
            Self::Float(v) => {
                let _ = write!(buf, "{v}");
            }
        }
    }
}

macro_rules! metric_value_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for MetricValue {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

metric_value_from!(Int as i64: i8, i16, i32, i64);
metric_value_from!(UInt as u64: u8, u16, u32, u64);
metric_value_from!(Float as f64: f32, f64);

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        Self::UInt(u64::try_from(value).unwrap_or(u64::MAX))
    }
}

impl From<isize> for MetricValue {
    fn from(value: isize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX }))
    }
}

/// Optional event fields recognized by the agent.
///
/// Fields are emitted in a fixed order regardless of how they were set:
/// `d`, `h`, `k`, `p`, `s`, `t`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    /// `date_happened`, a unix timestamp.
    pub date_happened: Option<String>,
    /// `hostname`
    pub hostname: Option<String>,
    /// `aggregation_key`
    pub aggregation_key: Option<String>,
    /// `priority`, `normal` or `low`.
    pub priority: Option<String>,
    /// `source_type_name`
    pub source_type_name: Option<String>,
    /// `alert_type`, one of `error`, `warning`, `info` or `success`.
    pub alert_type: Option<String>,
}

impl EventFields {
    /// Keys accepted by [`EventFields::set`], in emission order.
    pub const KEYS: [&'static str; 6] = [
        "date_happened",
        "hostname",
        "aggregation_key",
        "priority",
        "source_type_name",
        "alert_type",
    ];

    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field by its agent key. Returns `false` and leaves the fields
    /// unchanged if `key` is not recognized.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key {
            "date_happened" => &mut self.date_happened,
            "hostname" => &mut self.hostname,
            "aggregation_key" => &mut self.aggregation_key,
            "priority" => &mut self.priority,
            "source_type_name" => &mut self.source_type_name,
            "alert_type" => &mut self.alert_type,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    /// Sets `date_happened`.
    #[must_use]
    pub fn date_happened(mut self, value: impl Into<String>) -> Self {
        self.date_happened = Some(value.into());
        self
    }

    /// Sets `hostname`.
    #[must_use]
    pub fn hostname(mut self, value: impl Into<String>) -> Self {
        self.hostname = Some(value.into());
        self
    }

    /// Sets `aggregation_key`.
    #[must_use]
    pub fn aggregation_key(mut self, value: impl Into<String>) -> Self {
        self.aggregation_key = Some(value.into());
        self
    }

    /// Sets `priority`.
    #[must_use]
    pub fn priority(mut self, value: impl Into<String>) -> Self {
        self.priority = Some(value.into());
        self
    }

    /// Sets `source_type_name`.
    #[must_use]
    pub fn source_type_name(mut self, value: impl Into<String>) -> Self {
        self.source_type_name = Some(value.into());
        self
    }

    /// Sets `alert_type`.
    #[must_use]
    pub fn alert_type(mut self, value: impl Into<String>) -> Self {
        self.alert_type = Some(value.into());
        self
    }

    fn markers(&self) -> [(char, Option<&str>); 6] {
        [
            ('d', self.date_happened.as_deref()),
            ('h', self.hostname.as_deref()),
            ('k', self.aggregation_key.as_deref()),
            ('p', self.priority.as_deref()),
            ('s', self.source_type_name.as_deref()),
            ('t', self.alert_type.as_deref()),
        ]
    }
}

/// Builds fields from key/value pairs, ignoring unrecognized keys.
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EventFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.set(key.as_ref(), value);
        }
        fields
    }
}

impl<K: AsRef<str>, V: Into<String>, S> From<HashMap<K, V, S>> for EventFields {
    fn from(map: HashMap<K, V, S>) -> Self {
        map.into_iter().collect()
    }
}

/// Encodes a single metric packet.
///
/// The sample rate segment is only written when `sample_rate != 1`, and the tag
/// segment only when the merged tags are non-empty.
#[must_use]
pub fn encode_metric<T: AsRef<str>>(
    namespace: &str,
    instance_tags: &TagSet,
    name: &str,
    metric_type: MetricType,
    value: MetricValue,
    sample_rate: f64,
    call_tags: &[T],
) -> String {
    let mut buf = String::with_capacity(namespace.len() + name.len() + 32);

    if !namespace.is_empty() {
        buf.push_str(namespace);
        buf.push('.');
    }
    buf.push_str(name);
    buf.push(':');
    value.write_to(&mut buf);
    buf.push('|');
    buf.push_str(metric_type.as_str());

    #[allow(clippy::float_cmp)]
    if sample_rate != 1.0 {
        let _ = write!(buf, "|@{sample_rate:.6}");
    }

    write_tags(&mut buf, &merge_tags(instance_tags, call_tags));
    buf
}

/// Encodes a single event packet.
///
/// # Errors
/// Returns [`MetricsError::Validation`] if `title` or `text` is empty.
pub fn encode_event<T: AsRef<str>>(
    title: &str,
    text: &str,
    fields: Option<&EventFields>,
    instance_tags: &TagSet,
    call_tags: &[T],
) -> MetricResult<String> {
    if title.is_empty() {
        return Err(MetricsError::validation(
            "title must have at least one character",
        ));
    }
    if text.is_empty() {
        return Err(MetricsError::validation(
            "body must have at least one character",
        ));
    }

    let title = escape_newlines(title);
    let text = escape_newlines(text);

    let mut buf = String::with_capacity(title.len() + text.len() + 32);
    let mut len = itoa::Buffer::new();
    buf.push_str("_e{");
    buf.push_str(len.format(title.len()));
    buf.push(',');
    buf.push_str(len.format(text.len()));
    buf.push_str("}:");
    buf.push_str(&title);
    buf.push('|');
    buf.push_str(&text);

    if let Some(fields) = fields {
        for (marker, value) in fields.markers() {
            if let Some(value) = value {
                buf.push('|');
                buf.push(marker);
                buf.push(':');
                push_stripped(&mut buf, value);
            }
        }
    }

    write_tags(&mut buf, &merge_tags(instance_tags, call_tags));
    Ok(buf)
}

fn escape_newlines(s: &str) -> String {
    s.replace('\n', "\\n")
}

fn push_stripped(buf: &mut String, value: &str) {
    buf.extend(value.chars().filter(|&c| c != '|'));
}

fn write_tags(buf: &mut String, tags: &[&str]) {
    let mut iter = tags.iter();
    if let Some(first) = iter.next() {
        buf.push_str("|#");
        push_stripped(buf, first);
        for tag in iter {
            buf.push(',');
            push_stripped(buf, tag);
        }
    }
}
