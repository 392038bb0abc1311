//! Segment valves and the per-segment gate state derived from them.

use std::fmt;

/// Which end of its owning segment a valve sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValvePosition {
    Start,
    End,
}

impl fmt::Display for ValvePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValvePosition::Start => write!(f, "start"),
            ValvePosition::End => write!(f, "end"),
        }
    }
}

impl std::str::FromStr for ValvePosition {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "inlet" | "upstream" => Ok(ValvePosition::Start),
            "end" | "outlet" | "downstream" => Ok(ValvePosition::End),
            _ => Err("unknown valve position"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValveState {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for ValveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValveState::Open => write!(f, "open"),
            ValveState::Closed => write!(f, "closed"),
        }
    }
}

/// Isolation valve owned by a segment. The segment slot it occupies
/// ([`ValvePosition`]) is its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Valve {
    pub name: Option<String>,
    pub state: ValveState,
}

impl Valve {
    pub fn new(state: ValveState) -> Self {
        Self { name: None, state }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.state == ValveState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == ValveState::Closed
    }

    pub fn open(&mut self) {
        self.state = ValveState::Open;
    }

    pub fn close(&mut self) {
        self.state = ValveState::Closed;
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            ValveState::Open => ValveState::Closed,
            ValveState::Closed => ValveState::Open,
        };
    }
}

/// Flow-blocking status of a segment for one evaluation. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    Flowing,
    /// No flow enters: own start valve closed, or blocked further upstream.
    BlockedAtStart,
    /// Segment fills but nothing leaves: own end valve closed.
    BlockedAtEnd,
}

impl GateState {
    /// Whether the segment's own flow is computed.
    pub fn computes_flow(&self) -> bool {
        matches!(self, GateState::Flowing | GateState::BlockedAtEnd)
    }

    /// Whether flow continues into the next segment.
    pub fn passes_downstream(&self) -> bool {
        matches!(self, GateState::Flowing)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Flowing => write!(f, "flowing"),
            GateState::BlockedAtStart => write!(f, "blocked_at_start"),
            GateState::BlockedAtEnd => write!(f, "blocked_at_end"),
        }
    }
}

/// Gate state of a segment given the state of the segment before it
/// (`Flowing` for the first segment) and its own valves.
pub fn gate_state(upstream: GateState, start: Option<&Valve>, end: Option<&Valve>) -> GateState {
    if !upstream.passes_downstream() {
        return GateState::BlockedAtStart;
    }
    if start.is_some_and(Valve::is_closed) {
        return GateState::BlockedAtStart;
    }
    if end.is_some_and(Valve::is_closed) {
        return GateState::BlockedAtEnd;
    }
    GateState::Flowing
}
