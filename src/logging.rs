use std::fmt;

/// A request-scoped logger.
///
/// `RequestLog` is obtained from [`AdmittedRequest::log`](crate::AdmittedRequest::log)
/// and borrows the request, so it cannot outlive it.
///
/// All log messages automatically include the request ID for tracing.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
    route: &'a str,
}

impl<'a> RequestLog<'a> {
    /// Only admitted requests hand out loggers.
    pub(crate) fn new(request_id: &'a str, route: &'a str) -> Self {
        Self { request_id, route }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message with request ID.
    ///
    /// Use with `format_args!` for efficient formatting:
    /// ```no_run
    /// # use admission_core::RequestLog;
    /// # fn example(log: &RequestLog) {
    /// log.info(format_args!("profile found"));
    /// # }
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, route = %self.route, "{}", args);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, route = %self.route, "{}", args);
    }

    /// Logs an error-level message with request ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, route = %self.route, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, route = %self.route, "{}", args);
    }
}
