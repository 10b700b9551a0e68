//! Capture session state machine

use std::fmt;
use thiserror::Error;

/// Capture states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: String,
}

/// Capture session entity.
/// Manages state transitions for one capture toggle.
///
/// State machine:
///   IDLE -> CAPTURING (begin)
///   CAPTURING -> IDLE (end)
///   CAPTURING -> IDLE (cancel)
///
/// Ending a capture returns to IDLE synchronously; the exchange with the
/// backend runs afterwards without holding the session in any state, so a
/// new capture may begin while a previous exchange is still in flight.
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
}

impl CaptureSession {
    /// Create a new capture session in idle state
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    /// Check if currently capturing
    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    /// Transition from IDLE to CAPTURING
    pub fn begin(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin capture".to_string(),
            });
        }
        self.state = CaptureState::Capturing;
        Ok(())
    }

    /// Transition from CAPTURING to IDLE
    pub fn end(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Capturing {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "end capture".to_string(),
            });
        }
        self.state = CaptureState::Idle;
        Ok(())
    }

    /// Transition from CAPTURING to IDLE without producing a payload
    pub fn cancel(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Capturing {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "cancel capture".to_string(),
            });
        }
        self.state = CaptureState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = CaptureSession::new();
        assert!(session.is_idle());
        assert!(!session.is_capturing());
    }

    #[test]
    fn begin_from_idle() {
        let mut session = CaptureSession::new();
        assert!(session.begin().is_ok());
        assert!(session.is_capturing());
    }

    #[test]
    fn begin_while_capturing_fails() {
        let mut session = CaptureSession::new();
        session.begin().unwrap();

        let err = session.begin().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Capturing);
        assert!(err.action.contains("begin capture"));
    }

    #[test]
    fn end_from_capturing() {
        let mut session = CaptureSession::new();
        session.begin().unwrap();

        assert!(session.end().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn end_from_idle_fails() {
        let mut session = CaptureSession::new();

        let err = session.end().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Idle);
    }

    #[test]
    fn cancel_from_capturing() {
        let mut session = CaptureSession::new();
        session.begin().unwrap();

        assert!(session.cancel().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn cancel_from_idle_fails() {
        let mut session = CaptureSession::new();

        let err = session.cancel().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Idle);
    }

    #[test]
    fn full_cycle() {
        let mut session = CaptureSession::new();
        assert!(session.is_idle());

        session.begin().unwrap();
        assert!(session.is_capturing());

        session.end().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.begin().unwrap();
        assert!(session.is_capturing());
    }

    #[test]
    fn state_is_always_one_of_two() {
        // Drive an arbitrary toggle sequence and check the invariant
        let mut session = CaptureSession::new();
        let actions = [true, true, false, false, true, false, true, true];
        for begin in actions {
            if begin {
                let _ = session.begin();
            } else {
                let _ = session.end();
            }
            assert!(matches!(
                session.state(),
                CaptureState::Idle | CaptureState::Capturing
            ));
        }
    }

    #[test]
    fn state_display() {
        assert_eq!(CaptureState::Idle.to_string(), "idle");
        assert_eq!(CaptureState::Capturing.to_string(), "capturing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: CaptureState::Capturing,
            action: "begin capture".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("begin capture"));
        assert!(msg.contains("capturing"));
    }
}
