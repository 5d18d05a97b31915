//! Extraction boundary traits for web integration.
//!
//! This module defines the core abstraction for extracting admission inputs
//! from framework-specific request types.

use crate::args::RawArgs;
use crate::request::RequestMeta;

/// Extracts request metadata from a framework-specific request.
///
/// Implementations provide the request id and the principal resolved by
/// upstream authentication. They never decide whether the principal may
/// proceed; that is the pipeline's job.
///
/// # Examples
///
/// ```
/// use admission_core::web::ExtractMetadata;
/// use admission_core::{Principal, RequestMeta};
///
/// struct MyFrameworkRequest {
///     request_id: String,
///     user: Option<String>,
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn extract_metadata(&self) -> RequestMeta {
///         RequestMeta {
///             request_id: self.request_id.clone(),
///             principal: self
///                 .user
///                 .as_ref()
///                 .map_or(Principal::Anonymous, |u| Principal::user(u.as_str())),
///         }
///     }
/// }
/// ```
pub trait ExtractMetadata {
    /// Extracts request metadata for admission.
    fn extract_metadata(&self) -> RequestMeta;
}

/// Extracts raw arguments from a framework-specific request.
///
/// Every value that crosses the HTTP boundary enters as
/// [`Tainted`](crate::Tainted) inside [`RawArgs`] and stays unreadable until
/// the schema validator accepts it.
///
/// # Examples
///
/// ```
/// use admission_core::web::ExtractRawArgs;
/// use admission_core::RawArgs;
/// use std::collections::HashMap;
///
/// struct MyFrameworkRequest {
///     query: HashMap<String, String>,
/// }
///
/// impl ExtractRawArgs for MyFrameworkRequest {
///     fn extract_raw_args(&self) -> RawArgs {
///         let mut raw = RawArgs::new();
///         for (k, v) in &self.query {
///             raw.insert_query(k.as_str(), v.as_str());
///         }
///         raw
///     }
/// }
/// ```
pub trait ExtractRawArgs {
    /// Extracts all path and query arguments from the request.
    fn extract_raw_args(&self) -> RawArgs;
}
