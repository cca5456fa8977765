pub mod config;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod route;
pub mod tree;
pub mod types;

pub use error::{BridgeError, Result};
pub use policy::{Disposition, PolicySets, SuppressReason};
pub use resolver::{ActionNode, KeywordTable, Resolver};
pub use route::{RouteRule, RouteTable};
pub use types::{ActionId, ActionRequest, BridgeResult};
