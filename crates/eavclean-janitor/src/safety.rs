//! Confirmation gate in front of destructive sweeps
//!
//! The engine never prompts. Callers run the gate after filter validation
//! and before the first sweep call.

/// How a sweep will run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Classify and count only
    DryRun,
    /// Delete
    Live,
}

impl RunMode {
    /// Whether deletes are suppressed
    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

/// Why a sweep was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Neither flag was given and nobody can be asked
    NonInteractive,
    /// The operator answered no
    Declined,
}

impl Refusal {
    /// Message for the operator
    pub fn message(&self) -> &'static str {
        match self {
            Refusal::NonInteractive => {
                "neither --dry-run nor --force options were supplied, and we are not running interactively"
            }
            Refusal::Declined => "aborted by user",
        }
    }
}

/// Outcome of [`SafetyGate::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Run in the given mode
    Proceed(RunMode),
    /// Do not run
    Refused(Refusal),
}

/// The `--dry-run` / `--force` pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafetyGate {
    /// Suppress deletes
    pub dry_run: bool,
    /// Skip confirmation
    pub force: bool,
}

impl SafetyGate {
    /// Create a gate from the two flags
    pub fn new(dry_run: bool, force: bool) -> Self {
        Self { dry_run, force }
    }

    /// Decide whether and how to run
    ///
    /// `confirm` is called only when neither flag is set and the session is
    /// interactive. Dry-run wins over force.
    pub fn evaluate<F>(&self, interactive: bool, confirm: F) -> GateDecision
    where
        F: FnOnce() -> bool,
    {
        if self.dry_run {
            return GateDecision::Proceed(RunMode::DryRun);
        }
        if self.force {
            return GateDecision::Proceed(RunMode::Live);
        }
        if !interactive {
            return GateDecision::Refused(Refusal::NonInteractive);
        }
        if confirm() {
            GateDecision::Proceed(RunMode::Live)
        } else {
            GateDecision::Refused(Refusal::Declined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dry_run_never_prompts() {
        let asked = Cell::new(false);
        let decision = SafetyGate::new(true, true).evaluate(true, || {
            asked.set(true);
            false
        });
        assert_eq!(decision, GateDecision::Proceed(RunMode::DryRun));
        assert!(!asked.get());
    }

    #[test]
    fn test_force_skips_prompt() {
        let decision = SafetyGate::new(false, true).evaluate(false, || false);
        assert_eq!(decision, GateDecision::Proceed(RunMode::Live));
    }

    #[test]
    fn test_non_interactive_is_refused() {
        let decision = SafetyGate::default().evaluate(false, || true);
        assert_eq!(decision, GateDecision::Refused(Refusal::NonInteractive));
    }

    #[test]
    fn test_prompt_answer_decides() {
        assert_eq!(
            SafetyGate::default().evaluate(true, || true),
            GateDecision::Proceed(RunMode::Live)
        );
        assert_eq!(
            SafetyGate::default().evaluate(true, || false),
            GateDecision::Refused(Refusal::Declined)
        );
    }
}
