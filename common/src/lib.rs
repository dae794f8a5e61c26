use serde::{Deserialize, Serialize};

pub mod components;
pub mod math;
pub mod network;

pub use laminar;

/// Lifecycle of a single room's game.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Players gather; roles are unassigned.
    #[default]
    Lobby,
    InProgress,
    /// One team has won. The room may start a fresh game.
    Concluded,
}

/// The team a role belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    Crew,
    Impostor,
}

#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Alive,
    Dead,
}
