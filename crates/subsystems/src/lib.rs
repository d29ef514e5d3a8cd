// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! hydrogen-subsystems: reference `SubsystemPlugin` implementations for
//! every named external collaborator in spec §3's SubsystemIdentity list.
//! Each is a thin lifecycle carrier — the wire-level internals (HTTP
//! routing, WebSocket framing, PTY emulation, DNS-SD encoding, SMTP, …)
//! are Non-goals (spec §1); what's specified is how each plugs into the
//! orchestrator's launch/land passes and what it declares as its
//! dependency edge.

mod support;

pub mod api;
pub mod database;
pub mod logging;
pub mod mailrelay;
pub mod mdns;
pub mod network;
pub mod notify;
pub mod oidc;
pub mod payload;
pub mod print;
pub mod resources;
pub mod swagger;
pub mod terminal;
pub mod threads;
pub mod webserver;
pub mod websocket;

pub use api::ApiPlugin;
pub use database::DatabasePlugin;
pub use logging::LoggingPlugin;
pub use mailrelay::MailRelayPlugin;
pub use mdns::{MdnsClientPlugin, MdnsServerPlugin};
pub use network::NetworkPlugin;
pub use notify::NotifyPlugin;
pub use oidc::OidcPlugin;
pub use payload::PayloadPlugin;
pub use print::PrintPlugin;
pub use resources::ResourcesPlugin;
pub use swagger::SwaggerPlugin;
pub use terminal::TerminalPlugin;
pub use threads::ThreadsPlugin;
pub use webserver::WebServerPlugin;
pub use websocket::WebSocketPlugin;
