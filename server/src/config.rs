use crate::MAX_PLAYERS;
use clap::{Parser, ValueEnum};
use std::{net::SocketAddr, time::Duration};
use sus_common::laminar::Config as NetworkConfig;

pub const DEFAULT_KILL_RANGE: f32 = 50.0;
pub const DEFAULT_MIN_PLAYERS: usize = 4;

/// Who may issue the start command for a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StartPolicy {
    #[default]
    AnyMember,
    CreatorOnly,
}

/// What happens to a room once its last player leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EmptyRoomPolicy {
    /// Drop the room as soon as it is empty, freeing the id.
    #[default]
    Reap,
    /// Keep the room (and its password) around so it can be rejoined.
    Keep,
}

/// Game rules, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub kill_range: f32,
    pub min_players: usize,
    pub max_players: usize,
    pub start_policy: StartPolicy,
    pub empty_rooms: EmptyRoomPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            kill_range: DEFAULT_KILL_RANGE,
            min_players: DEFAULT_MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            start_policy: StartPolicy::default(),
            empty_rooms: EmptyRoomPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "server", version, about = "Authoritative room server for sus")]
pub struct Config {
    /// Address the UDP socket binds to.
    #[arg(long, default_value = "0.0.0.0:7600")]
    pub bind: SocketAddr,

    /// Maximum distance at which an impostor can kill.
    #[arg(long, default_value_t = DEFAULT_KILL_RANGE)]
    pub kill_range: f32,

    /// Players required before a game can start.
    #[arg(long, default_value_t = DEFAULT_MIN_PLAYERS)]
    pub min_players: usize,

    #[arg(long, default_value_t = MAX_PLAYERS)]
    pub max_players: usize,

    #[arg(long, value_enum, default_value_t = StartPolicy::AnyMember)]
    pub start_policy: StartPolicy,

    #[arg(long, value_enum, default_value_t = EmptyRoomPolicy::Reap)]
    pub empty_rooms: EmptyRoomPolicy,

    /// Seconds of silence before a client is considered gone.
    #[arg(long, default_value_t = 5)]
    pub idle_timeout_secs: u64,

    #[arg(long, default_value_t = 4)]
    pub heartbeat_secs: u64,
}

impl Config {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            kill_range: self.kill_range,
            min_players: self.min_players,
            max_players: self.max_players,
            start_policy: self.start_policy,
            empty_rooms: self.empty_rooms,
        }
    }

    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            idle_connection_timeout: Duration::from_secs(self.idle_timeout_secs),
            heartbeat_interval: Some(Duration::from_secs(self.heartbeat_secs)),
            ..NetworkConfig::default()
        }
    }
}
