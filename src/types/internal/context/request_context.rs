use std::{future::Future, net::IpAddr, time::Duration};

use poem::Request;
use tokio::time::Instant;

use crate::errors::{AuthError, Interruption};

use super::{
    cancellation::{CancellationHandle, CancellationSignal},
    request_id::RequestId,
    request_source::RequestSource,
};

/// Request context that flows through all layers
///
/// Carries the correlation id recorded in every log line of the operation,
/// the client address, and the deadline and cancellation signal that bound
/// every collaborator call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Point in time after which the operation is abandoned
    pub deadline: Option<Instant>,

    cancellation: CancellationSignal,
}

impl RequestContext {
    /// Create a context for an API request with no deadline
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            source: RequestSource::API,
            deadline: None,
            cancellation: CancellationSignal::never(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        let ctx = Self {
            source: RequestSource::CLI,
            ..Self::new()
        };
        tracing::debug!(request_id = %ctx.request_id, "CLI context created for {}", command_name);
        ctx
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        let ctx = Self {
            source: RequestSource::System,
            ..Self::new()
        };
        tracing::debug!(request_id = %ctx.request_id, "System context created for {}", operation_name);
        ctx
    }

    /// Create a RequestContext from an incoming HTTP request
    ///
    /// The deadline is set `timeout` from now.
    pub fn from_request(req: &Request, timeout: Duration) -> Self {
        let mut ctx = Self::new().with_timeout(timeout);
        ctx.ip_address = Self::extract_ip_address(req);

        tracing::trace!("Request context created: {:?}", ctx);
        ctx
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the deadline relative to now
    ///
    /// A timeout too large to represent leaves the context without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Attach a cancellation signal
    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancellation = signal;
        self
    }

    /// Make the context cancellable, returning the handle that cancels it
    pub fn cancellable(self) -> (Self, CancellationHandle) {
        let (handle, signal) = CancellationHandle::new();
        (self.with_cancellation(signal), handle)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Tracing span carrying the request id for one operation
    pub fn span(&self, operation: &'static str) -> tracing::Span {
        tracing::info_span!(
            "request",
            request_id = %self.request_id,
            source = ?self.source,
            operation
        )
    }

    /// Run `future` bounded by this context's deadline and cancellation signal
    ///
    /// The future is dropped as soon as either fires. Cancellation wins when
    /// both are already due.
    pub async fn run<F, T>(&self, operation: &'static str, future: F) -> Result<T, AuthError>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                tracing::debug!(request_id = %self.request_id, "{} cancelled", operation);
                Err(AuthError::Cancelled { operation, cause: Interruption::Cancelled })
            }
            _ = Self::expiry(self.deadline) => {
                tracing::debug!(request_id = %self.request_id, "{} ran past its deadline", operation);
                Err(AuthError::Cancelled { operation, cause: Interruption::DeadlineExceeded })
            }
            output = future => Ok(output),
        }
    }

    async fn expiry(deadline: Option<Instant>) {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
