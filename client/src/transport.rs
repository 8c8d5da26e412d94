//! Connection lifecycle state machine.
//!
//! The session owns the actual socket; this module keeps the connect /
//! reconnect bookkeeping explicit and testable. Reconnection is a fixed
//! 3000 ms interval with unbounded attempts, and at most one reconnect
//! timer is ever pending no matter how many close events pile up.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug)]
pub struct ConnectionSupervisor {
    state: ConnectionState,
    reconnect_pending: bool,
}

impl ConnectionSupervisor {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Closed,
            reconnect_pending: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Outbound sends and interactive controls are only valid while open.
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Begins a connection attempt. Idempotent: returns false while an
    /// attempt is in flight or a connection is open, so a stale reconnect
    /// timer firing after a fresh open is a safe no-op.
    pub fn request_connect(&mut self) -> bool {
        match self.state {
            ConnectionState::Closed => {
                self.state = ConnectionState::Connecting;
                true
            }
            ConnectionState::Connecting | ConnectionState::Open => {
                debug!("connect requested while {:?}, ignoring", self.state);
                false
            }
        }
    }

    /// Marks the channel open and cancels the pending reconnect timer.
    pub fn handle_open(&mut self) {
        self.state = ConnectionState::Open;
        self.reconnect_pending = false;
    }

    /// Marks the channel closed. Returns true iff a reconnect timer should
    /// be started now; repeated closes while one is already pending return
    /// false so timers never stack.
    pub fn handle_close(&mut self) -> bool {
        self.state = ConnectionState::Closed;
        if self.reconnect_pending {
            false
        } else {
            self.reconnect_pending = true;
            true
        }
    }

    /// The pending reconnect timer elapsed; the next close may schedule a
    /// new one.
    pub fn timer_fired(&mut self) {
        self.reconnect_pending = false;
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }
}

impl Default for ConnectionSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_idempotent_while_active() {
        let mut supervisor = ConnectionSupervisor::new();
        assert!(supervisor.request_connect());
        assert_eq!(supervisor.state(), ConnectionState::Connecting);

        // Second call while connecting is a no-op.
        assert!(!supervisor.request_connect());

        supervisor.handle_open();
        assert!(supervisor.is_open());
        assert!(!supervisor.request_connect());
        assert!(supervisor.is_open());
    }

    #[test]
    fn test_single_timer_across_repeated_closes() {
        let mut supervisor = ConnectionSupervisor::new();
        supervisor.request_connect();
        supervisor.handle_open();

        assert!(supervisor.handle_close());
        assert!(!supervisor.handle_close());
        assert!(!supervisor.handle_close());
        assert!(supervisor.reconnect_pending());
    }

    #[test]
    fn test_open_cancels_pending_timer() {
        let mut supervisor = ConnectionSupervisor::new();
        supervisor.request_connect();
        supervisor.handle_open();
        assert!(supervisor.handle_close());

        supervisor.request_connect();
        supervisor.handle_open();
        assert!(!supervisor.reconnect_pending());

        // Next failure schedules a fresh timer.
        assert!(supervisor.handle_close());
    }

    #[test]
    fn test_timer_fired_then_close_reschedules() {
        let mut supervisor = ConnectionSupervisor::new();
        supervisor.request_connect();
        supervisor.handle_open();
        assert!(supervisor.handle_close());

        supervisor.timer_fired();
        assert!(!supervisor.reconnect_pending());

        supervisor.request_connect();
        // Attempt fails before opening.
        assert!(supervisor.handle_close());
    }
}
