pub mod account;
pub mod client;
pub mod contract;
pub mod error;
pub mod stack;
pub mod utils;

pub use account::{AccountStatus, RawAccount};
pub use client::{LiteserverClient, LiteserverConfig, Network, TonClient, TonapiClient, ToncenterClient};
pub use error::{Error, Result};
pub use stack::{StackItem, TvmStack};

// Cell, BOC, and address primitives come from tonlib-core; re-export so
// callers do not need to pin the same version themselves.
pub use tonlib_core;
