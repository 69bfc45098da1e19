//! Remote dataset client and authentication.
//!
//! This module provides the [`RemoteClient`] for downloading dataset files
//! over HTTP, along with authentication types ([`Auth`], [`AuthType`]).

mod auth;
mod remote;

pub use auth::{Auth, AuthType};
pub use remote::RemoteClient;
