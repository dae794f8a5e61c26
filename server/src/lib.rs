pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;

pub use game::Game;

pub const MAX_PLAYERS: usize = 16;
