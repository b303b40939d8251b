use std::fmt;

use thiserror::Error;

/// Recoverable gameplay failures. The display text is shown to the player verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum InteractionError {
    #[error("Hands full!")]
    HandsFull,
    #[error("{0}")]
    NothingThere(EmptyTarget),
    #[error("{0}")]
    WrongState(StateMismatch),
    #[error("Already processing!")]
    AlreadyProcessing,
    #[error("Can't add this ingredient!")]
    MergeRejected,
    #[error("Counter occupied!")]
    CounterOccupied,
    #[error("Nothing nearby!")]
    NothingNearby,
}

impl InteractionError {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::HandsFull => "hands_full",
            Self::NothingThere(_) => "nothing_there",
            Self::WrongState(_) => "wrong_state",
            Self::AlreadyProcessing => "already_processing",
            Self::MergeRejected => "merge_rejected",
            Self::CounterOccupied => "counter_occupied",
            Self::NothingNearby => "nothing_nearby",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmptyTarget {
    PickUp,
    Chop,
    Cook,
    Serve,
}

impl fmt::Display for EmptyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PickUp => "Nothing to pick up!",
            Self::Chop => "Nothing to chop!",
            Self::Cook => "Nothing to cook!",
            Self::Serve => "Nothing to serve!",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateMismatch {
    AlreadyProcessed,
    NotChopped,
    AlreadyCooked,
    NotPlate,
    EmptyPlate,
}

impl fmt::Display for StateMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AlreadyProcessed => "Already processed!",
            Self::NotChopped => "Chop it first!",
            Self::AlreadyCooked => "Already cooked!",
            Self::NotPlate => "Plate it first!",
            Self::EmptyPlate => "Plate is empty!",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_matches_toast_copy() {
        let cases = [
            (InteractionError::HandsFull, "Hands full!"),
            (
                InteractionError::NothingThere(EmptyTarget::PickUp),
                "Nothing to pick up!",
            ),
            (
                InteractionError::NothingThere(EmptyTarget::Chop),
                "Nothing to chop!",
            ),
            (
                InteractionError::NothingThere(EmptyTarget::Cook),
                "Nothing to cook!",
            ),
            (
                InteractionError::WrongState(StateMismatch::AlreadyProcessed),
                "Already processed!",
            ),
            (
                InteractionError::WrongState(StateMismatch::NotChopped),
                "Chop it first!",
            ),
            (
                InteractionError::WrongState(StateMismatch::AlreadyCooked),
                "Already cooked!",
            ),
            (InteractionError::AlreadyProcessing, "Already processing!"),
            (InteractionError::MergeRejected, "Can't add this ingredient!"),
            (InteractionError::CounterOccupied, "Counter occupied!"),
            (InteractionError::NothingNearby, "Nothing nearby!"),
        ];
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
