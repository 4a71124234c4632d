use std::fmt;

use tracing::debug;

/// Identifies one submission of a screen. Tickets increase monotonically per
/// controller, so a reply can be matched to the submission that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The mutually exclusive states of one screen's result area.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<R> {
    /// Nothing requested yet, or reset.
    Idle,
    /// A request is in flight; only a reply carrying `ticket` may resolve it.
    Loading { ticket: Ticket },
    Success(R),
    /// The generic failure message for the operation.
    Failed(String),
    /// Input was rejected before any request was sent.
    ValidationError(String),
}

/// Inputs to [`ViewState::transition`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent<R> {
    Submit { ticket: Ticket },
    Reject(String),
    Resolve {
        ticket: Ticket,
        outcome: Result<R, String>,
    },
    Reset,
}

impl<R> Default for ViewState<R> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<R> ViewState<R> {
    /// The single transition function of the screen state machine.
    ///
    /// A `Resolve` whose ticket does not match the in-flight one is stale and
    /// leaves the state unchanged. That covers replies to superseded
    /// submissions and replies arriving after a reset.
    pub fn transition(self, event: ViewEvent<R>) -> Self {
        match (self, event) {
            (_, ViewEvent::Reset) => ViewState::Idle,
            (_, ViewEvent::Submit { ticket }) => ViewState::Loading { ticket },
            (_, ViewEvent::Reject(message)) => ViewState::ValidationError(message),
            (ViewState::Loading { ticket: current }, ViewEvent::Resolve { ticket, outcome })
                if current == ticket =>
            {
                match outcome {
                    Ok(result) => ViewState::Success(result),
                    Err(message) => ViewState::Failed(message),
                }
            }
            (state, ViewEvent::Resolve { ticket, .. }) => {
                debug!(%ticket, "Discarding stale response");
                state
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    pub fn result(&self) -> Option<&R> {
        match self {
            ViewState::Success(result) => Some(result),
            _ => None,
        }
    }

    /// The message to show in the error slot, for either failure state.
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) | ViewState::ValidationError(message) => Some(message),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        match self {
            ViewState::Loading { ticket } => Some(*ticket),
            _ => None,
        }
    }
}

/// Owns a screen's [`ViewState`] and issues its tickets.
#[derive(Debug)]
pub struct ViewController<R> {
    state: ViewState<R>,
    issued: u64,
}

impl<R> Default for ViewController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ViewController<R> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            issued: 0,
        }
    }

    pub fn state(&self) -> &ViewState<R> {
        &self.state
    }

    fn dispatch(&mut self, event: ViewEvent<R>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.transition(event);
    }

    /// Enter `Loading` under a fresh ticket. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.dispatch(ViewEvent::Submit { ticket });
        ticket
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.dispatch(ViewEvent::Reject(message.into()));
    }

    /// Deliver the reply for `ticket`. Returns false if it was stale and
    /// discarded.
    pub fn resolve<E: fmt::Display>(&mut self, ticket: Ticket, outcome: Result<R, E>) -> bool {
        let current = self.state.in_flight() == Some(ticket);
        self.dispatch(ViewEvent::Resolve {
            ticket,
            outcome: outcome.map_err(|e| e.to_string()),
        });
        current
    }

    pub fn reset(&mut self) {
        self.dispatch(ViewEvent::Reset);
    }
}
