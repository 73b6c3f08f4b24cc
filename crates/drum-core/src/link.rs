use crate::constants::SENSOR_RECONNECT_DELAY;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkParams {
    pub reconnect_delay: Duration,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            reconnect_delay: SENSOR_RECONNECT_DELAY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Connecting { attempt: u32 },
    Open,
    Reconnecting { attempt: u32 },
    Closed,
}

/// Connection lifecycle of the page-level sensor socket.
///
/// A dropped or refused connection is retried after a fixed delay, forever,
/// until [`SensorLink::close`] is called when the view unmounts.
#[derive(Clone, Debug)]
pub struct SensorLink {
    pub params: LinkParams,
    state: LinkState,
    attempts: u32,
}

impl Default for SensorLink {
    fn default() -> Self {
        Self::new(LinkParams::default())
    }
}

impl SensorLink {
    pub fn new(params: LinkParams) -> Self {
        Self {
            params,
            state: LinkState::Connecting { attempt: 1 },
            attempts: 1,
        }
    }

    #[inline]
    pub fn state(&self) -> LinkState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == LinkState::Closed
    }

    /// Total connection attempts so far, including the first.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn on_open(&mut self) {
        if matches!(self.state, LinkState::Connecting { .. }) {
            self.state = LinkState::Open;
        }
    }

    /// Socket closed or failed to connect. Returns the delay before the next
    /// attempt, or `None` once the link has been closed for good.
    pub fn on_close(&mut self) -> Option<Duration> {
        match self.state {
            LinkState::Closed => None,
            LinkState::Reconnecting { .. } => Some(self.params.reconnect_delay),
            LinkState::Connecting { .. } | LinkState::Open => {
                self.state = LinkState::Reconnecting {
                    attempt: self.attempts + 1,
                };
                Some(self.params.reconnect_delay)
            }
        }
    }

    /// Called when the reconnect delay elapsed. Returns true if a new socket
    /// should be opened.
    pub fn begin_reconnect(&mut self) -> bool {
        match self.state {
            LinkState::Reconnecting { attempt } => {
                self.attempts = attempt;
                self.state = LinkState::Connecting { attempt };
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.state = LinkState::Closed;
    }
}
