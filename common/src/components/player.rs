use crate::PlayerType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every role a player can be dealt at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Impostor,
    TaskMaster,
    Engineer,
    Medic,
}

impl Role {
    /// The cooperative roles, drawn with replacement for non-impostors.
    pub const CREW: [Role; 3] = [Role::TaskMaster, Role::Engineer, Role::Medic];

    pub const fn player_type(self) -> PlayerType {
        match self {
            Role::Impostor => PlayerType::Impostor,
            Role::TaskMaster | Role::Engineer | Role::Medic => PlayerType::Crew,
        }
    }

    pub const fn is_impostor(self) -> bool {
        matches!(self.player_type(), PlayerType::Impostor)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Impostor => "impostor",
            Role::TaskMaster => "task master",
            Role::Engineer => "engineer",
            Role::Medic => "medic",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// World-space position of a player. New players spawn at the origin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
