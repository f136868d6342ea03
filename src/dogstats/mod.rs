pub mod async_client;
pub mod client;
pub mod encoder;
pub mod guard;
pub mod macros;
pub mod options;
pub mod tags;
pub mod writer;

/// Empty call-site tag list, for sends that carry only the instance tags.
pub const NO_TAGS: &[&str] = &[];
