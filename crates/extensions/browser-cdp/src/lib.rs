//! # jobfill Browser (CDP)
//!
//! Drives a real Chrome tab through the Chrome DevTools Protocol and exposes
//! it as a [`jobfill_protocols::Page`].
//!
//! ## Layout
//!
//! - [`cdp`] - WebSocket client and per-tab sessions
//! - [`manager`] - Chrome discovery, launch and tab handout
//! - [`CdpPage`] - The page adapter; DOM work runs in an injected bridge script

pub mod bridge;
pub mod cdp;
pub mod manager;
pub mod page;

pub use manager::{BrowserError, BrowserManager};
pub use page::CdpPage;
