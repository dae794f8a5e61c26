use crate::components::player::PlayerId;
use std::{collections::HashMap, net::SocketAddr};

/// Maps a live connection to the player it owns. Holds keys only; the
/// player record itself lives in [`super::Players`].
#[derive(Debug, Default)]
pub struct IdentityRegistry(HashMap<SocketAddr, PlayerId>);

impl IdentityRegistry {
    pub fn resolve(&self, addr: &SocketAddr) -> Option<PlayerId> {
        self.0.get(addr).copied()
    }

    /// Returns the previous binding, which callers treat as a bug.
    pub fn bind(&mut self, addr: SocketAddr, id: PlayerId) -> Option<PlayerId> {
        self.0.insert(addr, id)
    }

    pub fn unbind(&mut self, addr: &SocketAddr) -> Option<PlayerId> {
        self.0.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SocketAddr, &PlayerId)> {
        self.0.iter()
    }
}
