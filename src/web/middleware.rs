//! Request dispatch: admission, handler body and rendering in one call.
//!
//! ```text
//! HTTP Request
//!   ↓
//! Framework-specific code builds a RequestAdapter
//!   ↓
//! dispatch() extracts RequestMeta and RawArgs
//!   ↓
//! AdmissionPipeline validates, then checks the route's policy
//!   ↓
//! Handler body runs on the AdmittedRequest
//!   ↓
//! Response (JSON body, mapped status)
//! ```

use crate::collaborator::ResourceDirectory;
use crate::error::{ConfigError, Rejection};
use crate::gate::{AdmissionOutcome, AdmissionPipeline};
use crate::handler::Handler;
use crate::response::Response;

use super::{ExtractMetadata, ExtractRawArgs};

/// Runs one request through admission and, if admitted, through `handler`.
///
/// Rejections from admission and handler failures are both rendered into a
/// [`Response`]; a handler is never invoked for a rejected request.
///
/// # Errors
///
/// Returns [`ConfigError::UnregisteredRoute`] if the handler's route has no
/// binding in the pipeline's registry.
///
/// # Examples
///
/// ```
/// use admission_core::web::{access_validators, dispatch, RequestAdapter};
/// use admission_core::{AdmissionPipeline, FeatureFlagStore, InMemoryDirectory, Principal};
/// use std::sync::Arc;
///
/// let directory = Arc::new(InMemoryDirectory::new());
/// let pipeline = AdmissionPipeline::new(
///     Arc::new(access_validators::registry().unwrap()),
///     Arc::new(FeatureFlagStore::default()),
///     directory.clone(),
/// );
///
/// let mut adapter = RequestAdapter::new("req-1");
/// adapter.set_principal(Principal::user("uid-1"));
///
/// let response = dispatch(
///     &pipeline,
///     &adapter,
///     &access_validators::ManageOwnAccount,
///     directory.as_ref(),
/// )
/// .unwrap();
/// assert_eq!(response.status().as_u16(), 200);
/// ```
pub fn dispatch<A, H>(
    pipeline: &AdmissionPipeline,
    adapter: &A,
    handler: &H,
    directory: &dyn ResourceDirectory,
) -> Result<Response, ConfigError>
where
    A: ExtractMetadata + ExtractRawArgs + ?Sized,
    H: Handler + ?Sized,
{
    let meta = adapter.extract_metadata();
    let raw = adapter.extract_raw_args();

    let request = match pipeline.admit_request(handler.route(), handler.verb(), &raw, meta)? {
        AdmissionOutcome::Proceed(request) => request,
        AdmissionOutcome::Reject(rejection) => return Ok(Response::from_rejection(&rejection)),
    };

    let log = request.log();
    match handler.handle(&request, directory) {
        Ok(body) => {
            log.debug(format_args!("handler completed"));
            Ok(Response::ok(body))
        }
        Err(err) => {
            log.info(format_args!("handler failed: {}", err));
            Ok(Response::from_rejection(&Rejection::from(err)))
        }
    }
}
