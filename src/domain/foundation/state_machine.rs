//! Validated transitions for lifecycle enums.

use super::ValidationError;

/// A lifecycle enum with a fixed transition table.
///
/// ```ignore
/// let open = ChannelState::Connecting.transition_to(ChannelState::Open)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// States reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("{:?} -> {:?} is not allowed", self, target),
            ))
        }
    }

    /// No way out.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
