use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user clicked the highlighted region.
    Activated,
    /// The user pressed the skip control.
    Skipped,
    /// The target could not be found, so nothing was shown.
    Unsatisfied,
}

impl Outcome {
    /// Boolean sent back over the service boundary: `true` means the user
    /// skipped the step.
    pub fn as_reply(self) -> bool {
        matches!(self, Outcome::Skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Pending,
    Resolved(Outcome),
    /// The step was cleaned or superseded without an outcome.
    Cancelled,
}

/// Sending half of a step's completion. Firing consumes it, so a session
/// can resolve at most once; dropping it cancels the step.
#[derive(Debug)]
pub struct Resolver {
    tx: Sender<Outcome>,
}

impl Resolver {
    pub fn fire(self, outcome: Outcome) {
        if self.tx.send(outcome).is_err() {
            tracing::debug!(?outcome, "completion dropped before the step resolved");
        }
    }
}

#[derive(Debug)]
pub struct Completion {
    rx: Option<Receiver<Outcome>>,
    settled: Option<CompletionState>,
}

pub fn completion_pair() -> (Resolver, Completion) {
    let (tx, rx) = channel();
    (
        Resolver { tx },
        Completion {
            rx: Some(rx),
            settled: None,
        },
    )
}

impl Completion {
    /// A completion that is already resolved, for steps that end before
    /// anything is shown.
    pub fn ready(outcome: Outcome) -> Self {
        Self {
            rx: None,
            settled: Some(CompletionState::Resolved(outcome)),
        }
    }

    pub fn poll(&mut self) -> CompletionState {
        if let Some(state) = self.settled {
            return state;
        }
        let state = match self.rx.as_ref().map(|rx| rx.try_recv()) {
            Some(Ok(outcome)) => CompletionState::Resolved(outcome),
            Some(Err(TryRecvError::Empty)) => return CompletionState::Pending,
            Some(Err(TryRecvError::Disconnected)) | None => CompletionState::Cancelled,
        };
        self.settled = Some(state);
        self.rx = None;
        state
    }

    pub fn is_settled(&mut self) -> bool {
        !matches!(self.poll(), CompletionState::Pending)
    }
}
