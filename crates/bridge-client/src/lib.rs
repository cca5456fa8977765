//! `bridge-client`: client half of the action bridge.
//!
//! # Architecture
//!
//! ```text
//! click target
//!     │
//!     ▼
//! Resolver        ← ancestor walk: ignore zone → override → button-like
//!     │              then keyword inference / `.run` fallback
//!     ▼
//! PolicySets      ← enabled / in-progress / unknown
//!     │
//!     ▼
//! BridgeClient    ← POST /api/bridge, every outcome folded into BridgeResult
//! ```
//!
//! The resolver and policy live in `bridge-core`; this crate wires them to
//! the network in [`dispatch::ActionBridge`]. The playground and tool pages
//! call [`BridgeClient`] directly.

pub mod client;
pub mod dispatch;
pub mod playground;
pub mod tool;

pub use client::{BridgeClient, SendOptions, DEFAULT_ENDPOINT};
pub use dispatch::{ActionBridge, ClickEvent, ClickOutcome};
pub use playground::{GenerateOutcome, GenerateRequest, Playground};
pub use tool::{run_tool, ToolRun, ToolStatus};
