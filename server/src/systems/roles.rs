use crate::{
    config::StartPolicy,
    error::{Precondition, SessionResult},
    events::{OutgoingPacket, Outbox},
    game::Game,
};
use log::{debug, info};
use rand::{seq::SliceRandom, Rng};
use std::net::SocketAddr;
use sus_common::{
    components::player::{Position, Role},
    network::ServerToClient,
    GameState, PlayerState,
};

/// Impostor slots for a room of `players`: one in five, rounded up.
pub fn impostor_count(players: usize) -> usize {
    (players + 4) / 5
}

/// Deals one role per roster slot. A uniform shuffle picks the impostor
/// slots; every other slot draws a crew role independently.
pub fn assign_roles<R: Rng + ?Sized>(players: usize, rng: &mut R) -> Vec<Role> {
    let mut order: Vec<usize> = (0..players).collect();
    order.shuffle(rng);

    let mut roles = vec![Role::Impostor; players];
    for &slot in &order[impostor_count(players)..] {
        roles[slot] = Role::CREW[rng.gen_range(0..Role::CREW.len())];
    }

    roles
}

pub fn start_game(game: &mut Game, addr: SocketAddr) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;
    let room = game.room(&session.room_id);

    if game.config.start_policy == StartPolicy::CreatorOnly && room.creator != Some(session.player_id)
    {
        return Err(Precondition::NotRoomCreator.into());
    }

    if room.state == GameState::InProgress {
        return Err(Precondition::GameInProgress.into());
    }

    if room.len() < game.config.min_players {
        return Err(Precondition::InsufficientPlayers {
            required: game.config.min_players,
            present: room.len(),
        }
        .into());
    }

    let roster = room.roster().to_vec();
    let roles = assign_roles(roster.len(), &mut game.rng);

    let mut outbox = Vec::with_capacity(roster.len() + 2);

    for (&id, &role) in roster.iter().zip(&roles) {
        let player = game.player_mut(id);
        player.role = Some(role);
        player.state = PlayerState::Alive;
        player.pos = Position::default();

        debug!("{} is {} in room {:?}", player.name, role, session.room_id);
        outbox.push(OutgoingPacket::to_single(player.addr, ServerToClient::RoleAssigned(role)));
    }

    let room = game.room_mut(&session.room_id);
    room.state = GameState::InProgress;
    room.tally.clear();

    info!(
        "Game started in room {:?} with {} players ({} impostors)",
        session.room_id,
        roster.len(),
        impostor_count(roster.len())
    );

    outbox.push(game.broadcast(&session.room_id, ServerToClient::GameStarted));
    outbox.push(game.roster_update(&session.room_id));

    Ok(outbox)
}
