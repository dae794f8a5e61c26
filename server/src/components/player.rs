use std::net::SocketAddr;
use sus_common::{
    components::player::{Position, Role},
    network::PlayerPacket,
    PlayerState, PlayerType,
};

pub type PlayerId = u16;

/// The one authoritative record for a connected player. Rooms and the
/// identity registry refer to it by [`PlayerId`] only.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub addr: SocketAddr,
    pub name: String,
    pub room_id: String,
    pub role: Option<Role>,
    pub state: PlayerState,
    pub pos: Position,
}

impl Player {
    pub fn new(id: PlayerId, addr: SocketAddr, name: String, room_id: String) -> Self {
        Self {
            id,
            addr,
            name,
            room_id,
            role: None,
            state: PlayerState::Alive,
            pos: Position::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    pub fn player_type(&self) -> Option<PlayerType> {
        self.role.map(Role::player_type)
    }

    pub fn is_impostor(&self) -> bool {
        self.role.map_or(false, Role::is_impostor)
    }

    pub fn to_packet(&self) -> PlayerPacket {
        PlayerPacket::new(self.name.clone(), self.is_alive(), self.pos)
    }
}
