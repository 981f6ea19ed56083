//! # nicshift — vSphere NIC migration
//!
//! Batch-moves VM network adapters onto NSX logical switches through a
//! vCenter session, tracking each reconfiguration task to completion
//! over the change-notification feed.
//!
//! ## Modules
//!
//! - **types** — Shared data structures (object refs, task states, device specs)
//! - **error** — Crate-specific error types
//! - **session** — `VimSession` capability trait + update-feed types
//! - **client** — vCenter HTTP client with session-based auth
//! - **inventory** — Name → object resolution over container views
//! - **task** — Task-completion tracking (filter + update loop)
//! - **reconfigure** — Per-VM NIC migration workflow
//! - **batch** — Row-isolated batch driver

pub mod types;
pub mod error;
pub mod session;
pub mod client;
pub mod inventory;
pub mod task;
pub mod reconfigure;
pub mod batch;

#[cfg(test)]
pub(crate) mod testkit;
