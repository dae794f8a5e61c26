use super::VoteTally;
use crate::components::player::PlayerId;
use std::collections::HashMap;
use sus_common::GameState;

#[derive(Debug)]
pub struct Room {
    pub id: String,
    password: String,
    /// Who may start the game under the creator-only policy. Passes to the
    /// longest-standing member when the creator leaves.
    pub creator: Option<PlayerId>,
    roster: Vec<PlayerId>,
    pub state: GameState,
    pub tally: VoteTally,
}

impl Room {
    pub fn new(id: String, password: String, creator: PlayerId) -> Self {
        Self {
            id,
            password,
            creator: Some(creator),
            roster: vec![creator],
            state: GameState::Lobby,
            tally: VoteTally::default(),
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Player ids in join order.
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.roster.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn add(&mut self, id: PlayerId) {
        if self.roster.is_empty() {
            self.creator = Some(id);
        }
        self.roster.push(id);
    }

    /// Drops `id` from the roster and from any open vote.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        let before = self.roster.len();
        self.roster.retain(|member| *member != id);
        self.tally.remove(id);

        if self.creator == Some(id) {
            self.creator = self.roster.first().copied();
        }

        self.roster.len() != before
    }
}

/// Room id to room state.
#[derive(Debug, Default)]
pub struct RoomDirectory(HashMap<String, Room>);

impl RoomDirectory {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Room> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.0.get_mut(id)
    }

    pub fn insert(&mut self, room: Room) {
        self.0.insert(room.id.clone(), room);
    }

    pub fn remove(&mut self, id: &str) -> Option<Room> {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.0.values()
    }
}
