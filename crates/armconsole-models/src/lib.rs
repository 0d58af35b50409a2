#![deny(missing_docs)]

//! # ARM Console Models
//!
//! Data types shared by the ARM console client and the local mock service.
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`cloud`] | Cloud environments and their endpoints |
//! | [`credentials`] | Service-principal credential set |
//! | [`resource_group`] | Resource groups and list pages |
//! | [`subscription`] | Subscriptions and `SubscriptionId` |
//! | [`deployment`] | Template deployments and parameters |
//! | [`error`] | ARM error response bodies |

pub mod cloud;
pub mod credentials;
pub mod deployment;
pub mod error;
pub mod resource_group;
pub mod subscription;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `armconsole_models::ResourceGroup` directly.
pub use cloud::*;
pub use credentials::*;
pub use deployment::*;
pub use error::*;
pub use resource_group::*;
pub use subscription::*;
