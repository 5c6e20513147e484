//! AI rendering collaborator boundary.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::types::{Finding, RenderedInsight};

/// Natural-language rendering of structured findings.
///
/// The engine hands over dimension lists and counts; the collaborator owns
/// all prompt engineering and wording. The contract is deliberately thin:
/// an opaque text-in/text-out call, no retries, and no schema beyond a
/// non-empty string plus zero or more recognized dimension names echoed
/// back as tags. Unrecognized tags are dropped by the engine, never
/// reported as errors.
#[async_trait]
pub trait InsightRenderer: Send + Sync {
    /// Render a structured finding into user-facing prose.
    async fn render(&self, finding: &Finding) -> EngineResult<RenderedInsight>;
}
