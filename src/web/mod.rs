//! Web framework integration surface.
//!
//! This module provides the boundary between HTTP frameworks and the
//! admission pipeline. It handles:
//! - Mapping HTTP requests to domain types (`RequestMeta`, `RawArgs`)
//! - Introducing taint at the boundary (untrusted inputs → `Tainted<String>`)
//! - Running admission and the handler body, and rendering the response
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: This module contains no framework-specific code.
//!    It defines interfaces that framework-specific code can implement.
//!
//! 2. **Taint at Boundary**: All path and query values are wrapped in
//!    `Tainted<String>` at extraction time and read only by the schema validator.
//!
//! 3. **No Authorization**: The adapter carries the principal resolved by
//!    upstream authentication. Whether it may proceed is decided by the
//!    route's policy inside the pipeline.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//! let adapter = RequestAdapter::from(http_req);
//! let response = dispatch(&pipeline, &adapter, &access_validators::ProfileExists, &directory)?;
//! ```

pub mod access_validators;
mod adapter;
mod extract;
mod middleware;

pub use adapter::RequestAdapter;
pub use extract::{ExtractMetadata, ExtractRawArgs};
pub use middleware::dispatch;
