//! Network Module
//!
//! Carries the command protocol over TCP.
//!
//! ## Architecture
//! - [`Server`] accepts one peer at a time; each peer gets a fresh session
//!   (greeting, `READY`, empty buffers) against the same device
//! - [`Connection`] runs a session over one stream
//! - [`Client`] drives a session from the host side

mod client;
mod connection;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use server::Server;
