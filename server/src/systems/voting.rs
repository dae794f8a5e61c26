//! Per-room suspicion voting.
//!
//! A room's tally is empty while no round is open. The first vote of a round
//! seeds it with every living player at zero, votes accumulate until someone
//! finishes the round, and finishing always empties it again.

use crate::{
    error::{Precondition, SessionResult},
    events::{OutgoingPacket, Outbox},
    game::Game,
    resources::VoteTally,
    systems::kill,
};
use log::{debug, info};
use std::net::SocketAddr;
use sus_common::{
    network::{ServerToClient, VoteTallyPacket},
    GameState, PlayerState,
};

pub fn vote(game: &mut Game, addr: SocketAddr, target_name: &str) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;
    let room_id = session.room_id.as_str();
    let room = game.room(room_id);

    if room.state != GameState::InProgress {
        return Err(Precondition::GameNotInProgress.into());
    }

    if !game.player(session.player_id).is_alive() {
        return Err(Precondition::DeadPlayer("vote").into());
    }

    // Work on a copy so a rejected vote does not leave a freshly seeded round behind.
    let mut tally = if room.tally.is_open() {
        room.tally.clone()
    } else {
        VoteTally::seeded(game.living(room_id).map(|player| player.id))
    };

    let target_name = target_name.trim();
    let target = tally
        .candidates()
        .find(|id| game.player(*id).name == target_name)
        .ok_or(Precondition::InvalidVoteTarget)?;

    tally.record(target);
    game.room_mut(room_id).tally = tally;

    debug!("Vote against {} in room {:?}", target_name, room_id);

    Ok(vec![tally_update(game, room_id)])
}

pub fn finish_voting(game: &mut Game, addr: SocketAddr) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;
    let room_id = session.room_id.as_str();

    if game.room(room_id).state != GameState::InProgress {
        return Err(Precondition::GameNotInProgress.into());
    }

    let tally = game.room_mut(room_id).tally.take();
    let living = game.living(room_id).count();

    // The leader needs at least half of the living players behind them.
    let eliminated = tally
        .leader()
        .filter(|&(_, votes)| votes > 0 && 2 * votes as usize >= living)
        .map(|(id, _)| id);

    let id = match eliminated {
        Some(id) => id,
        None => {
            info!("Round in room {:?} ended without an elimination", room_id);
            return Ok(vec![game.broadcast(room_id, ServerToClient::NoElimination)]);
        },
    };

    let player = game.player_mut(id);
    player.state = PlayerState::Dead;
    let name = player.name.clone();

    info!("{} was voted out of room {:?}", name, room_id);

    let mut outbox = vec![
        game.broadcast(room_id, ServerToClient::PlayerEliminated(name)),
        game.roster_update(room_id),
    ];
    outbox.extend(kill::check_end_game(game, room_id));

    Ok(outbox)
}

pub(crate) fn tally_update(game: &Game, room_id: &str) -> OutgoingPacket {
    let votes = game
        .room(room_id)
        .tally
        .entries()
        .iter()
        .map(|&(id, count)| (game.player(id).name.clone(), count))
        .collect();

    game.broadcast(room_id, ServerToClient::VoteTally(VoteTallyPacket { votes }))
}
