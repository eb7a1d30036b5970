//! Validated environment configuration
//!
//! Reads the process environment once at startup, reshapes annotated
//! variables, validates the result against a schema and exposes it through a
//! typed lookup service registered in a `fibre_ioc` container.
//!
//! ## Pipeline
//!
//! ```text
//! raw env → preprocessor (field transforms) → schema → EnvironmentService<E>
//! ```
//!
//! - **Transforms**: `#[env(transform)]` splits `"a,b,c"` into a list,
//!   `#[env(transform(separator = ";"))]` picks another separator and
//!   `#[env(transform(to_class))]` parses the value as JSON (an object or a
//!   list of objects for a nested shape)
//! - **Schema**: any [`ValidationSchema`]; [`StructSchema`] coerces through
//!   serde/`config` and checks `validator` constraints
//! - **Lookup**: `service.get(AppEnv::PORT)` returns `&u16`
//!
//! ## Example
//!
//! ```ignore
//! use envshape::{Environment, EnvironmentConfig, EnvironmentModule};
//! use serde::Deserialize;
//! use std::net::IpAddr;
//! use validator::Validate;
//!
//! #[derive(Debug, Deserialize, Validate, Environment)]
//! #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
//! struct AppEnv {
//!     node_env: String,
//!     #[validate(range(min = 1))]
//!     port: u16,
//!     #[env(transform)]
//!     allowed_ips: Vec<IpAddr>,
//! }
//!
//! let container = fibre_ioc::Container::new();
//! let env = EnvironmentModule::for_root(EnvironmentConfig::<AppEnv>::structured())
//!     .init(&container)?;
//! let port = env.get(AppEnv::PORT);
//! ```

// Lets the derive macro's `::envshape::` paths resolve inside this crate too
extern crate self as envshape;

pub mod error;
pub mod module;
pub mod preprocess;
pub mod schema;
pub mod service;
pub mod shape;
pub mod transform;

// Re-export main types
pub use envshape_macros::Environment;
pub use error::{EnvError, Result};
pub use module::{EnvironmentConfig, EnvironmentModule, resolve_environment, resolve_preprocessor};
pub use preprocess::{EnvironmentPreprocessor, PreprocessedEnv, RawEnvironment, read_process_env};
pub use schema::{SchemaValidator, StructSchema, ValidationSchema};
pub use service::EnvironmentService;
pub use shape::{EnvKey, EnvironmentShape};
pub use transform::{FieldTransforms, TransformOptions, TransformRegistry};
