//! Concrete acquirer implementations
//!
//! Both sources share the same discipline: downloads are staged in a hidden
//! subdirectory and only promoted into the destination once everything
//! succeeded, and a content-hashed fetch manifest makes repeat fetches free.

mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalSource;
