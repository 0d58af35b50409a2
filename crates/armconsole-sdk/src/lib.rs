//! # ARM Console SDK
//!
//! Thin client for the Azure Resource Manager (ARM) REST API, scoped to
//! what the console needs.
//!
//! The SDK provides:
//!
//! * [`ArmSession`]: a service principal authenticated against one cloud.
//! * [`ArmClient`]: a session bound to a subscription; implements
//!   [`ResourceManager`].
//! * [`ResourceManager`]: the four resource-group / deployment operations,
//!   as a trait so callers can substitute a fake.
//! * [`ArmPaths`]: canonical Resource Manager URLs.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use armconsole_models::{CloudEnvironment, Credentials};
//! use armconsole_sdk::{ArmSession, ClientOptions, ResourceManager};
//! use zeroize::Zeroizing;
//!
//! # async fn run() -> Result<(), armconsole_sdk::SdkError> {
//! let credentials = Credentials::new(
//!     "app-id",
//!     Zeroizing::new("secret".to_string()),
//!     "tenant-id",
//!     "",
//!     CloudEnvironment::Global,
//! );
//! let endpoints = credentials.cloud.endpoints();
//! let session = ArmSession::authenticate(&credentials, &endpoints, &ClientOptions::default()).await?;
//! let client = session.with_subscription(credentials.subscription_id.as_ref()).await?;
//!
//! for group in client.list_resource_groups().await? {
//!     println!("{} {}", group.name, group.provisioning_state());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod manager;
pub mod paths;

pub use auth::{AccessToken, ArmSession};
pub use client::{ArmClient, ClientOptions};
pub use error::SdkError;
pub use manager::ResourceManager;
pub use paths::ArmPaths;
