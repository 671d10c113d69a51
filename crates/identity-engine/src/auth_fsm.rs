//! Authentication state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!                 RestoreRequested               SignInAttempt
//!   NotSignedIn ───────────────────► Restoring    NotSignedIn ──────► SigningIn
//!        ▲                              │                                 │
//!        │            TokenNotExpired   │  SessionExpired                 │ SignInSuccess
//!        │      ┌───────────────────────┴──────────────┐                  ▼
//!        │      ▼                                      ▼               SignedIn ◄─┐
//!        │  VerifyingWithServer                    Refreshing ◄── TokenExpired ─┤
//!        │      │ ServerVerified ──► SignedIn          │ RefreshSuccess ────────┘
//!        │      │ ServerRejected ──► NotSignedIn       │ RefreshAbandoned ──► SignedIn
//!        │                                             │ RefreshFailed ──► NotSignedIn
//!        │
//!        └──── SignOutComplete ◄── SigningOut ◄── SignOutRequested (SignedIn)
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub auth_machine(NotSignedIn)

    NotSignedIn => {
        RestoreRequested => Restoring,
        SignInAttempt => SigningIn
    },
    Restoring => {
        // Token not expired locally - must verify with the provider
        TokenNotExpired => VerifyingWithServer,
        // Token expired locally - attempt refresh
        SessionExpired => Refreshing,
        NoSession => NotSignedIn
    },
    VerifyingWithServer => {
        ServerVerified => SignedIn,
        ServerRejected => NotSignedIn
    },
    SigningIn => {
        SignInSuccess => SignedIn,
        SignInFailed => NotSignedIn,
        // A failed attempt while an earlier session is still valid
        PriorSessionKept => SignedIn
    },
    SignedIn => {
        TokenExpired => Refreshing,
        SignInAttempt => SigningIn,
        SignOutRequested => SigningOut,
        SessionRevoked => NotSignedIn
    },
    Refreshing => {
        RefreshSuccess => SignedIn,
        RefreshRetry => Refreshing,
        // Transient failures exhausted the retries; keep the session for later
        RefreshAbandoned => SignedIn,
        RefreshFailed => NotSignedIn,
        // Sign-out wins over a refresh still in flight
        SignOutRequested => SigningOut
    },
    SigningOut => {
        SignOutComplete => NotSignedIn
    }
}

pub use auth_machine::Input as AuthMachineInput;
pub use auth_machine::State as AuthMachineState;
pub use auth_machine::StateMachine as AuthMachine;

/// Simplified view of the FSM state for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    NotSignedIn,
    /// Reading the persisted session.
    Restoring,
    /// Checking a persisted session with the provider.
    VerifyingWithServer,
    SigningIn,
    SignedIn,
    /// Minting a fresh ID token.
    Refreshing,
    SigningOut,
}

impl AuthState {
    /// Returns true if the user has a valid session (SignedIn state only).
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::SignedIn)
    }

    /// Returns true if the state is a transient/in-progress state.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthState::Restoring
                | AuthState::VerifyingWithServer
                | AuthState::SigningIn
                | AuthState::Refreshing
                | AuthState::SigningOut
        )
    }
}

impl From<&AuthMachineState> for AuthState {
    fn from(state: &AuthMachineState) -> Self {
        match state {
            AuthMachineState::NotSignedIn => AuthState::NotSignedIn,
            AuthMachineState::Restoring => AuthState::Restoring,
            AuthMachineState::VerifyingWithServer => AuthState::VerifyingWithServer,
            AuthMachineState::SigningIn => AuthState::SigningIn,
            AuthMachineState::SignedIn => AuthState::SignedIn,
            AuthMachineState::Refreshing => AuthState::Refreshing,
            AuthMachineState::SigningOut => AuthState::SigningOut,
        }
    }
}

/// Configuration for retry behavior during token refresh.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Maximum number of attempts.
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RefreshConfig {
    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_not_signed_in() {
        let machine = AuthMachine::new();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_sign_in_flow() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SigningIn);

        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_sign_in_failure_returns_to_not_signed_in() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInFailed).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_failed_switch_keeps_prior_session() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::PriorSessionKept).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_restore_verified_with_server() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::RestoreRequested).unwrap();
        machine.consume(&AuthMachineInput::TokenNotExpired).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::VerifyingWithServer);

        machine.consume(&AuthMachineInput::ServerVerified).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_restore_rejected_by_server() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::RestoreRequested).unwrap();
        machine.consume(&AuthMachineInput::TokenNotExpired).unwrap();
        machine.consume(&AuthMachineInput::ServerRejected).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_cannot_skip_server_verification() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::RestoreRequested).unwrap();
        assert!(machine.consume(&AuthMachineInput::ServerVerified).is_err());
        assert_eq!(*machine.state(), AuthMachineState::Restoring);
    }

    #[test]
    fn test_restore_expired_refreshes() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::RestoreRequested).unwrap();
        machine.consume(&AuthMachineInput::SessionExpired).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::Refreshing);

        machine.consume(&AuthMachineInput::RefreshSuccess).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_restore_without_session() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::RestoreRequested).unwrap();
        machine.consume(&AuthMachineInput::NoSession).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_refresh_retry_then_abandon_keeps_session() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        machine.consume(&AuthMachineInput::TokenExpired).unwrap();
        machine.consume(&AuthMachineInput::RefreshRetry).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::Refreshing);

        machine.consume(&AuthMachineInput::RefreshAbandoned).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SignedIn);
    }

    #[test]
    fn test_refresh_failure_signs_out() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        machine.consume(&AuthMachineInput::TokenExpired).unwrap();
        machine.consume(&AuthMachineInput::RefreshFailed).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_sign_out_during_refresh() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        machine.consume(&AuthMachineInput::TokenExpired).unwrap();
        machine.consume(&AuthMachineInput::SignOutRequested).unwrap();
        machine.consume(&AuthMachineInput::SignOutComplete).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);

        // The refresh finishing late cannot sign anyone back in.
        assert!(machine.consume(&AuthMachineInput::RefreshSuccess).is_err());
    }

    #[test]
    fn test_sign_out_flow() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        machine.consume(&AuthMachineInput::SignOutRequested).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::SigningOut);

        machine.consume(&AuthMachineInput::SignOutComplete).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_session_revoked() {
        let mut machine = AuthMachine::new();

        machine.consume(&AuthMachineInput::SignInAttempt).unwrap();
        machine.consume(&AuthMachineInput::SignInSuccess).unwrap();
        machine.consume(&AuthMachineInput::SessionRevoked).unwrap();
        assert_eq!(*machine.state(), AuthMachineState::NotSignedIn);
    }

    #[test]
    fn test_invalid_transition_returns_error() {
        let mut machine = AuthMachine::new();

        assert!(machine.consume(&AuthMachineInput::SignOutRequested).is_err());
        assert!(machine.consume(&AuthMachineInput::SignInSuccess).is_err());
    }

    #[test]
    fn test_auth_state_flags() {
        assert!(AuthState::SignedIn.is_authenticated());
        assert!(!AuthState::Refreshing.is_authenticated());
        assert!(!AuthState::NotSignedIn.is_transient());
        assert!(!AuthState::SignedIn.is_transient());
        assert!(AuthState::Restoring.is_transient());
        assert!(AuthState::SigningOut.is_transient());
        assert_eq!(
            AuthState::from(&AuthMachineState::VerifyingWithServer),
            AuthState::VerifyingWithServer
        );
    }

    #[test]
    fn test_refresh_config_delay_exponential_backoff() {
        let config = RefreshConfig::default();

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(4000));
        assert_eq!(config.delay_for_attempt(4), Duration::from_millis(5000));
        assert_eq!(config.delay_for_attempt(80), Duration::from_millis(5000));
    }
}
