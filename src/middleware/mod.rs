/*
 * Responsibility
 * - Ordered middleware pipeline (Stage / Pipeline)
 *   - the first listed stage is the outermost layer
 *   - invalid orders are rejected when the pipeline is built, never at request time
 * - Re-exports of the per-stage modules
 */
use axum::Router;
use thiserror::Error;

pub mod auth;
pub mod correlation;
pub mod docs;
pub mod http;
pub mod logging;
pub mod recovery;
pub mod security_headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Recovery,
    Logging,
    CorrelationId,
    Docs,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("recovery must be the outermost stage")]
    RecoveryNotOutermost,
    #[error("docs must run inside logging")]
    DocsBeforeLogging,
    #[error("stage listed twice: {0:?}")]
    Duplicate(Stage),
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Result<Self, PipelineError> {
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(PipelineError::Duplicate(*stage));
            }
        }

        if let Some(pos) = stages.iter().position(|s| *s == Stage::Recovery)
            && pos != 0
        {
            return Err(PipelineError::RecoveryNotOutermost);
        }

        let logging = stages.iter().position(|s| *s == Stage::Logging);
        let docs = stages.iter().position(|s| *s == Stage::Docs);
        if let (Some(logging), Some(docs)) = (logging, docs)
            && docs < logging
        {
            return Err(PipelineError::DocsBeforeLogging);
        }

        Ok(Self { stages })
    }

    /// Recovery -> Logging -> CorrelationId -> Docs -> routes.
    pub fn production() -> Self {
        Self {
            stages: vec![
                Stage::Recovery,
                Stage::Logging,
                Stage::CorrelationId,
                Stage::Docs,
            ],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Wrap `router` with every stage.
    ///
    /// `Router::layer` wraps from the inside out, so stages are applied in reverse.
    pub fn apply(&self, router: Router) -> Router {
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| match stage {
                Stage::Recovery => recovery::apply(router),
                Stage::Logging => logging::apply(router),
                Stage::CorrelationId => correlation::apply(router),
                Stage::Docs => docs::apply(router),
            })
    }
}
