//! `tavern-bot` — the hosting shell around `tavern-core`: invocation
//! routing, the platform-event loop, error-to-reply translation, config,
//! and the sandbox binary.

pub mod config;
pub mod dispatch;
pub mod events;
pub mod request;
pub mod sandbox;
