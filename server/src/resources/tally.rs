use crate::components::player::PlayerId;

/// Suspicion votes for one voting round of one room.
///
/// Empty means no round is open. The first vote of a round seeds one entry
/// per living player, in roster order, which is also the tie-break order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VoteTally {
    entries: Vec<(PlayerId, u32)>,
}

impl VoteTally {
    pub fn seeded(candidates: impl IntoIterator<Item = PlayerId>) -> Self {
        Self { entries: candidates.into_iter().map(|id| (id, 0)).collect() }
    }

    pub fn is_open(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.entries.iter().any(|(candidate, _)| *candidate == id)
    }

    pub fn candidates(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn entries(&self) -> &[(PlayerId, u32)] {
        &self.entries
    }

    /// Returns false when `id` is not a candidate this round.
    pub fn record(&mut self, id: PlayerId) -> bool {
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == id) {
            Some((_, votes)) => {
                *votes = votes.saturating_add(1);
                true
            },
            None => false,
        }
    }

    pub fn remove(&mut self, id: PlayerId) {
        self.entries.retain(|(candidate, _)| *candidate != id);
    }

    /// The candidate with the most votes. Ties go to the earliest entry.
    pub fn leader(&self) -> Option<(PlayerId, u32)> {
        self.entries.iter().fold(None, |best, &(id, votes)| match best {
            Some((_, best_votes)) if best_votes >= votes => best,
            _ => Some((id, votes)),
        })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
