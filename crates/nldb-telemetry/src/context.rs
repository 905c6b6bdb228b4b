//! Per-turn request context, correlating every component hop's log lines.

use tracing::Span;
use uuid::Uuid;

/// Identifies one in-flight turn for log correlation, carrying the
/// `requestId` that every component along the pipeline stamps onto its
/// tracing span.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    component: String,
    operation: Option<String>,
    user_id: Option<String>,
    session_id: Option<String>,
}

impl RequestContext {
    /// Start a new context for `component`, generating a fresh request id.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            component: component.into(),
            operation: None,
            user_id: None,
            session_id: None,
        }
    }

    /// Continue an existing turn under a known request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Record which operation within the component this context covers.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach the acting user's id.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach the session id the turn is running under.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// The request id every downstream hop should log against.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Build a `tracing` span stamped with this context's fields.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "turn",
            request_id = %self.request_id,
            component = %self.component,
            operation = self.operation.as_deref().unwrap_or(""),
            user_id = self.user_id.as_deref().unwrap_or(""),
            session_id = self.session_id.as_deref().unwrap_or(""),
        )
    }

    /// Enter this context's span for the lifetime of the returned guard.
    #[must_use]
    pub fn enter(&self) -> RequestGuard {
        RequestGuard {
            _span: self.span().entered(),
        }
    }
}

/// RAII guard keeping a [`RequestContext`]'s span entered.
pub struct RequestGuard {
    _span: tracing::span::EnteredSpan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_request_id_across_builder_calls() {
        let id = Uuid::new_v4();
        let ctx = RequestContext::new("orchestrator")
            .with_request_id(id)
            .with_operation("classify");
        assert_eq!(ctx.request_id(), id);
    }
}
