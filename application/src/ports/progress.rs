//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use council_domain::{ConsensusVerdict, DebatePhase, Response, Round};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain lines, nothing at all).
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when the orchestrator enters a new phase
    fn on_phase_change(&self, _phase: &DebatePhase) {}

    /// Called when a round starts
    fn on_round_start(&self, round: u32, max_rounds: u32, backends: usize);

    /// Called as each backend of the current round finishes, in completion order
    fn on_backend_complete(&self, round: u32, response: &Response);

    /// Called when a round has been recorded and checked for consensus
    fn on_round_complete(&self, round: &Round, verdict: &ConsensusVerdict);

    /// Called before the synthesis prompt is sent
    fn on_synthesis_start(&self) {}

    /// Called with the backend that produced the final answer, if any did
    fn on_synthesis_complete(&self, _backend: Option<&str>) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: u32, _max_rounds: u32, _backends: usize) {}
    fn on_backend_complete(&self, _round: u32, _response: &Response) {}
    fn on_round_complete(&self, _round: &Round, _verdict: &ConsensusVerdict) {}
}
