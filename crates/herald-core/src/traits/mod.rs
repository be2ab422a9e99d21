// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Provider adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch. The content source is synchronous:
//! its documents are loaded once and read under a lock that never blocks on I/O.

pub mod adapter;
pub mod content;
pub mod provider;

pub use adapter::PluginAdapter;
pub use content::ContentSource;
pub use provider::{ProviderAdapter, ProviderStream};
