use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::analyzer::Analyzer;
use crate::patch;
use crate::source::{SourceResolver, SourceSelector};
use crate::types::Vulnerability;

/// Phase of one audit run. Transitions are driven exclusively through
/// [`AuditSession`] methods; there is no other way to move between states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditState {
    #[default]
    Idle,
    Fetching,
    Analyzing,
    Reporting,
    Done,
    Error,
}

impl std::fmt::Display for AuditState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AuditState::Idle => "idle",
            AuditState::Fetching => "fetching",
            AuditState::Analyzing => "analyzing",
            AuditState::Reporting => "reporting",
            AuditState::Done => "done",
            AuditState::Error => "error",
        };
        f.write_str(label)
    }
}

/// Contract violations by the caller. Collaborator failures (source
/// resolution, analysis) never surface here; they put the session into
/// the `Error` state instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{operation} is not valid in the {state} state")]
    InvalidTransition {
        operation: &'static str,
        state: AuditState,
    },
    #[error("no finding with id {0} in the current report")]
    UnknownFinding(u32),
}

/// Mutable state of one audit run, from start to reset.
///
/// Exactly one session exists per process and all mutation goes through
/// `&mut self`, so there are no concurrent writers; the state guards still
/// reject out-of-order calls from a buggy caller.
#[derive(Default)]
pub struct AuditSession {
    state: AuditState,
    source_text: String,
    findings: Vec<Vulnerability>,
    selected: BTreeSet<u32>,
    result_text: Option<String>,
    error_message: Option<String>,
}

impl AuditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuditState {
        self.state
    }

    /// The text being audited; empty until a run has fetched its source
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn findings(&self) -> &[Vulnerability] {
        &self.findings
    }

    pub fn selected(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    /// Patched output; set only once the session reaches `Done`
    pub fn result_text(&self) -> Option<&str> {
        self.result_text.as_deref()
    }

    /// Failure description; set only while the session is in `Error`
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Run one audit: resolve the selector, submit the source for analysis,
    /// and land in `Reporting` (findings stored, selection cleared) or
    /// `Error` (message stored). Valid only from `Idle`; in particular a
    /// second audit may not start while one is fetching or analyzing.
    pub async fn start_audit<R, A>(
        &mut self,
        selector: &SourceSelector,
        resolver: &R,
        analyzer: &A,
    ) -> Result<(), SessionError>
    where
        R: SourceResolver + ?Sized,
        A: Analyzer + ?Sized,
    {
        self.guard(AuditState::Idle, "start_audit")?;
        self.clear();

        self.state = AuditState::Fetching;
        info!("Fetching contract source");
        match resolver.resolve(selector) {
            Ok(text) => self.source_text = text,
            Err(e) => {
                warn!("Source resolution failed: {e:#}");
                self.fail(format!("Failed to fetch the contract source: {e}"));
                return Ok(());
            }
        }

        self.state = AuditState::Analyzing;
        info!(
            "Analyzing {} lines of contract source",
            self.source_text.split('\n').count()
        );
        match analyzer.analyze(&self.source_text).await {
            Ok(findings) => {
                info!("Analysis complete: {} findings", findings.len());
                self.findings = findings;
                self.selected.clear();
                self.state = AuditState::Reporting;
            }
            Err(e) => {
                warn!("Analysis failed: {e:#}");
                self.fail(format!("Failed to analyze the contract: {e}"));
            }
        }
        Ok(())
    }

    /// Flip whether the finding with `id` will be patched in. Valid only
    /// from `Reporting`; `id` must belong to the current report.
    pub fn toggle_selection(&mut self, id: u32) -> Result<(), SessionError> {
        self.guard(AuditState::Reporting, "toggle_selection")?;
        if !self.findings.iter().any(|f| f.id == id) {
            return Err(SessionError::UnknownFinding(id));
        }
        if !self.selected.insert(id) {
            self.selected.remove(&id);
        }
        debug!("Selection now {:?}", self.selected);
        Ok(())
    }

    /// Splice the selected fixes into the source and finish the run.
    /// An empty selection is a passthrough: the result equals the source.
    pub fn apply_patches(&mut self) -> Result<&str, SessionError> {
        self.guard(AuditState::Reporting, "apply_patches")?;
        info!("Applying {} selected patches", self.selected.len());
        let patched = patch::apply_patches(&self.source_text, &self.findings, &self.selected);
        self.state = AuditState::Done;
        Ok(self.result_text.insert(patched).as_str())
    }

    /// Discard the current run and return to `Idle`. Valid from any state.
    pub fn reset(&mut self) {
        info!("Resetting audit session");
        self.clear();
        self.state = AuditState::Idle;
    }

    fn guard(&self, expected: AuditState, operation: &'static str) -> Result<(), SessionError> {
        if self.state() != expected {
            return Err(SessionError::InvalidTransition {
                operation,
                state: self.state(),
            });
        }
        Ok(())
    }

    fn fail(&mut self, message: String) {
        self.error_message = Some(message);
        self.state = AuditState::Error;
    }

    fn clear(&mut self) {
        self.source_text.clear();
        self.findings.clear();
        self.selected.clear();
        self.result_text = None;
        self.error_message = None;
    }
}
