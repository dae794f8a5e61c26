use thiserror::Error;

/// Why a single inbound command was rejected. Rejections never change state
/// and are reported only to the connection that issued the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("you are not in a game")]
    NotInSession,
    #[error("room {0:?} does not exist")]
    RoomNotFound(String),
    #[error("room {0:?} already exists")]
    RoomConflict(String),
    #[error("wrong password")]
    AccessDenied,
    #[error(transparent)]
    PreconditionFailed(#[from] Precondition),
    #[error("malformed message")]
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("invite more friends: {required} players needed to start, {present} present")]
    InsufficientPlayers { required: usize, present: usize },
    #[error("only impostors can kill")]
    NotAuthorizedToKill,
    #[error("no one to kill")]
    NoEligibleTargets,
    #[error("vote target is not a living player")]
    InvalidVoteTarget,
    #[error("dead players cannot {0}")]
    DeadPlayer(&'static str),
    #[error("the game is not in progress")]
    GameNotInProgress,
    #[error("a game is already in progress")]
    GameInProgress,
    #[error("you are already in a room")]
    AlreadyInRoom,
    #[error("room is full ({0} players)")]
    RoomFull(usize),
    #[error("name must not be empty")]
    EmptyName,
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("only the room creator can start the game")]
    NotRoomCreator,
    #[error("version mismatch: server speaks {expected}, client sent {received}")]
    VersionMismatch { expected: u32, received: u32 },
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_messages_pass_through() {
        let err = SessionError::from(Precondition::DeadPlayer("vote"));
        assert_eq!(err.to_string(), "dead players cannot vote");

        let err = SessionError::from(Precondition::InsufficientPlayers { required: 4, present: 2 });
        assert!(err.to_string().contains("4 players needed"));
    }
}
