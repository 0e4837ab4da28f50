//! Hook coordinator: callback validation and oracle bookkeeping

pub mod hook;
pub mod permissions;

pub use hook::BackrunHook;
pub use permissions::{HookCallback, HookPermissions};
