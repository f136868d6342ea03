use crate::{MetricResult, MetricsError};

/// Largest payload sent by default, in bytes.
pub const MAX_PACKET_SIZE: usize = 8192;

/// Enforces the packet size limit.
///
/// Packets within `max_size` pass through unchanged. Larger packets are cut to
/// exactly `max_size` bytes when `auto_truncate` is set, without regard for
/// segment boundaries, and rejected otherwise.
///
/// # Errors
/// Returns [`MetricsError::PacketTooLarge`] when the packet is over the limit
/// and `auto_truncate` is disabled.
pub fn guard(packet: &[u8], max_size: usize, auto_truncate: bool) -> MetricResult<&[u8]> {
    let size = packet.len();
    if size <= max_size {
        return Ok(packet);
    }

    if auto_truncate {
        tracing::debug!("truncating packet from {size} to {max_size} bytes");
        Ok(&packet[..max_size])
    } else {
        Err(MetricsError::PacketTooLarge {
            size,
            max: max_size,
        })
    }
}
