mod identity;
mod rooms;
mod tally;

pub use identity::*;
pub use rooms::*;
pub use tally::*;

use crate::components::player::{Player, PlayerId};
use std::collections::HashMap;

/// Owning store of every live player record.
#[derive(Debug, Default)]
pub struct Players(HashMap<PlayerId, Player>);

impl Players {
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.0.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.0.get_mut(&id)
    }

    pub fn insert(&mut self, player: Player) {
        self.0.insert(player.id, player);
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        self.0.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.0.values()
    }
}

#[derive(Debug, Default)]
pub struct PlayerIdCounter(pub PlayerId);

impl PlayerIdCounter {
    pub fn next_id(&mut self) -> PlayerId {
        let id = self.0;
        self.0 = self.0.wrapping_add(1);
        id
    }
}
