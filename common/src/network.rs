use crate::{
    components::player::{Position, Role},
    PlayerType,
};
use laminar::Packet;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::net::SocketAddr;

pub const GAME_VERSION: u32 = 1;
pub const INPUT_STREAM: u8 = 0;
pub const CHAT_STREAM: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryType {
    Unreliable,
    UnreliableSequenced,
    ReliableUnordered,
    ReliableSequenced,
    ReliableOrdered,
}

pub fn make_packet(
    delivery_type: DeliveryType,
    payload: Vec<u8>,
    addr: SocketAddr,
    stream_id: Option<u8>,
) -> Packet {
    match delivery_type {
        DeliveryType::Unreliable => Packet::unreliable(addr, payload),
        DeliveryType::UnreliableSequenced => Packet::unreliable_sequenced(addr, payload, stream_id),
        DeliveryType::ReliableUnordered => Packet::reliable_unordered(addr, payload),
        DeliveryType::ReliableSequenced => Packet::reliable_sequenced(addr, payload, stream_id),
        DeliveryType::ReliableOrdered => Packet::reliable_ordered(addr, payload, stream_id),
    }
}

pub fn encode<T: Serialize>(message: &T) -> bincode::Result<Vec<u8>> {
    bincode::serialize(message)
}

pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> bincode::Result<T> {
    bincode::deserialize(payload)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerToClient {
    ConnectAck,
    /// Human-readable room notice (joins, leaves, renames).
    Notice(String),
    Error(String),
    /// Only ever sent to the player holding the role.
    RoleAssigned(Role),
    RosterUpdated(RosterPacket),
    PositionsUpdated(RosterPacket),
    GameStarted,
    PlayerKilled(PlayerKilledPacket),
    /// Sent to a killer whose attempt found nobody in range.
    NoTargetInRange,
    VoteTally(VoteTallyPacket),
    PlayerEliminated(String),
    NoElimination,
    GameConcluded(GameConcludedPacket),
    Chat(ChatPacket),
}

/// Public view of a player. Roles are deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPacket {
    pub name: String,
    pub alive: bool,
    pub pos: Position,
}

impl PlayerPacket {
    pub fn new(name: String, alive: bool, pos: Position) -> Self {
        Self { name, alive, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPacket {
    pub players: Vec<PlayerPacket>,
}

impl RosterPacket {
    pub fn new(players: Vec<PlayerPacket>) -> Self {
        Self { players }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKilledPacket {
    pub killer: String,
    pub victim: String,
}

/// Candidate name to vote count, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTallyPacket {
    pub votes: Vec<(String, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConcludedPacket {
    pub winner: PlayerType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPacket {
    pub from: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientToServer {
    Connect(ConnectPacket),
    CreateRoom(RoomPacket),
    JoinRoom(RoomPacket),
    Rename(String),
    LeaveRoom,
    StartGame,
    Kill,
    Vote(String),
    FinishVoting,
    Move(Vec<PositionPacket>),
    Chat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectPacket {
    pub version: u32,
    pub name: String,
}

impl ConnectPacket {
    pub fn new(name: &str) -> Self {
        Self { version: GAME_VERSION, name: name.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPacket {
    pub room_id: String,
    pub password: String,
    pub name: String,
}

impl RoomPacket {
    pub fn new(room_id: &str, password: &str, name: &str) -> Self {
        Self { room_id: room_id.to_string(), password: password.to_string(), name: name.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPacket {
    pub name: String,
    pub pos: Position,
}

impl PositionPacket {
    pub fn new(name: &str, pos: Position) -> Self {
        Self { name: name.to_string(), pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_command_survives_the_wire() {
        let command = ClientToServer::Vote("red".to_string());
        let bytes = encode(&command).unwrap();

        assert_eq!(decode::<ClientToServer>(&bytes).unwrap(), command);
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert!(decode::<ClientToServer>(&[0xff, 0xff, 0xff, 0xff, 0x01]).is_err());
        assert!(decode::<ClientToServer>(&[]).is_err());
    }

    #[test]
    fn test_connect_packet_carries_current_version() {
        let packet = ConnectPacket::new("blue");
        assert_eq!(packet.version, GAME_VERSION);
        assert_eq!(packet.name, "blue");
    }
}
