use serde::{Deserialize, Serialize};

/// Readiness of the binding to the external printer service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    /// No binding requested, or the binding was released by teardown
    #[default]
    Unbound,
    /// Bind requested, waiting for the runtime to deliver the connect event
    Binding,
    /// Service reachable but the printer session could not be opened
    ConnectedNotReady,
    /// Open and init both succeeded; commands may be issued
    Ready,
    /// The runtime reported that the service link dropped
    Disconnected,
}

impl ConnectionState {
    /// Check if state allows a new bind request
    pub fn can_bind(&self) -> bool {
        matches!(
            self,
            Self::Unbound | Self::Disconnected | Self::ConnectedNotReady
        )
    }

    /// Check if device commands may be issued
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Check if a connect event is still outstanding
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Binding)
    }

    /// Transition to binding state
    pub fn to_binding(&self) -> Result<Self, &'static str> {
        if self.can_bind() {
            Ok(Self::Binding)
        } else {
            Err("Can only bind from Unbound, Disconnected or ConnectedNotReady state")
        }
    }

    /// Transition after the printer session opened successfully
    pub fn to_ready(&self) -> Result<Self, &'static str> {
        match self {
            Self::Binding | Self::Disconnected | Self::ConnectedNotReady => Ok(Self::Ready),
            _ => Err("Can only become ready while a connect event is being handled"),
        }
    }

    /// Transition after the printer session failed to open
    pub fn to_not_ready(&self) -> Result<Self, &'static str> {
        match self {
            Self::Binding | Self::Disconnected | Self::ConnectedNotReady => {
                Ok(Self::ConnectedNotReady)
            }
            _ => Err("Can only fail a session while a connect event is being handled"),
        }
    }

    /// Transition to disconnected state
    pub fn to_disconnected(&self) -> Self {
        Self::Disconnected
    }

    /// Transition to unbound state
    pub fn to_unbound(&self) -> Self {
        Self::Unbound
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unbound => "Unbound",
            Self::Binding => "Binding",
            Self::ConnectedNotReady => "ConnectedNotReady",
            Self::Ready => "Ready",
            Self::Disconnected => "Disconnected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_unbound() {
        let state = ConnectionState::default();
        assert_eq!(state, ConnectionState::Unbound);
        assert!(state.can_bind());
        assert!(!state.is_ready());
    }

    #[test]
    fn test_transition_unbound_to_binding() {
        let next = ConnectionState::Unbound.to_binding().unwrap();
        assert_eq!(next, ConnectionState::Binding);
        assert!(next.is_transitioning());
    }

    #[test]
    fn test_transition_binding_to_ready() {
        let next = ConnectionState::Binding.to_ready().unwrap();
        assert_eq!(next, ConnectionState::Ready);
        assert!(next.is_ready());
    }

    #[test]
    fn test_transition_binding_to_not_ready() {
        let next = ConnectionState::Binding.to_not_ready().unwrap();
        assert_eq!(next, ConnectionState::ConnectedNotReady);
        assert!(!next.is_ready());
        assert!(!next.is_transitioning());
    }

    #[test]
    fn test_cannot_bind_while_binding_or_ready() {
        assert!(ConnectionState::Binding.to_binding().is_err());
        assert!(ConnectionState::Ready.to_binding().is_err());
    }

    #[test]
    fn test_rebind_allowed_after_failure_or_drop() {
        assert!(ConnectionState::ConnectedNotReady.to_binding().is_ok());
        assert!(ConnectionState::Disconnected.to_binding().is_ok());
    }

    #[test]
    fn test_connect_event_rejected_when_unbound_or_ready() {
        assert!(ConnectionState::Unbound.to_ready().is_err());
        assert!(ConnectionState::Ready.to_ready().is_err());
        assert!(ConnectionState::Unbound.to_not_ready().is_err());
    }

    #[test]
    fn test_to_disconnected_from_any_state() {
        assert_eq!(
            ConnectionState::Ready.to_disconnected(),
            ConnectionState::Disconnected
        );
        assert_eq!(
            ConnectionState::ConnectedNotReady.to_disconnected(),
            ConnectionState::Disconnected
        );
    }

    #[test]
    fn test_to_unbound_from_any_state() {
        assert_eq!(ConnectionState::Ready.to_unbound(), ConnectionState::Unbound);
        assert_eq!(
            ConnectionState::Binding.to_unbound(),
            ConnectionState::Unbound
        );
    }

    #[test]
    fn test_only_ready_is_ready() {
        assert!(ConnectionState::Ready.is_ready());
        assert!(!ConnectionState::Unbound.is_ready());
        assert!(!ConnectionState::Binding.is_ready());
        assert!(!ConnectionState::ConnectedNotReady.is_ready());
        assert!(!ConnectionState::Disconnected.is_ready());
    }
}
