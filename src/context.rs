/*
 * Responsibility
 * - RequestContext: the typed per-request scope stored in request extensions
 *   - correlation id (set by the correlation middleware)
 *   - claims (set only by SecurityHandler after a successful check)
 * - Deriving a context never mutates its parent; attaching claims twice replaces them
 */
use std::fmt;

use ulid::Ulid;

use crate::services::auth::Claims;

/// Per-request identifier tying together the log lines of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Fresh 26-character, lexicographically sortable id.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    correlation_id: Option<CorrelationId>,
    claims: Option<Claims>,
}

impl RequestContext {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id: Some(correlation_id),
            claims: None,
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_ref().map(CorrelationId::as_str)
    }

    /// Derive a child context carrying `claims`.
    pub fn with_claims(&self, claims: Claims) -> Self {
        Self {
            correlation_id: self.correlation_id.clone(),
            claims: Some(claims),
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }
}
