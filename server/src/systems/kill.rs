use crate::{
    components::player::PlayerId,
    error::{Precondition, SessionResult},
    events::{OutgoingPacket, Outbox},
    game::Game,
    systems::voting,
};
use log::{debug, info};
use std::net::SocketAddr;
use sus_common::{
    components::player::Position,
    math::Distance,
    network::{GameConcludedPacket, PlayerKilledPacket, ServerToClient},
    GameState, PlayerState, PlayerType,
};

/// Nearest candidate within `range` of `origin`. Equidistant candidates
/// resolve to whichever comes first.
pub fn select_target(
    origin: Position,
    candidates: impl IntoIterator<Item = (PlayerId, Position)>,
    range: f32,
) -> Option<PlayerId> {
    candidates
        .into_iter()
        .map(|(id, pos)| (id, origin.distance(&pos)))
        .filter(|(_, distance)| *distance <= range)
        .fold(None, |nearest, (id, distance)| match nearest {
            Some((_, nearest_distance)) if nearest_distance <= distance => nearest,
            _ => Some((id, distance)),
        })
        .map(|(id, _)| id)
}

pub fn kill(game: &mut Game, addr: SocketAddr) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;
    let room_id = session.room_id.as_str();
    let killer = game.player(session.player_id);

    if !killer.is_impostor() {
        return Err(Precondition::NotAuthorizedToKill.into());
    }

    if game.room(room_id).state != GameState::InProgress {
        return Err(Precondition::GameNotInProgress.into());
    }

    if !killer.is_alive() {
        return Err(Precondition::DeadPlayer("kill").into());
    }

    let candidates: Vec<_> = game
        .living(room_id)
        .filter(|player| player.id != killer.id)
        .map(|player| (player.id, player.pos))
        .collect();

    if candidates.is_empty() {
        return Err(Precondition::NoEligibleTargets.into());
    }

    let victim_id = match select_target(killer.pos, candidates, game.config.kill_range) {
        Some(id) => id,
        None => {
            debug!("{} found nobody in range in room {:?}", killer.name, room_id);
            return Ok(vec![OutgoingPacket::to_single(addr, ServerToClient::NoTargetInRange)]);
        },
    };

    let killer_name = killer.name.clone();

    let victim = game.player_mut(victim_id);
    victim.state = PlayerState::Dead;
    let victim_name = victim.name.clone();

    game.room_mut(room_id).tally.remove(victim_id);

    info!("{} killed {} in room {:?}", killer_name, victim_name, room_id);

    // A conclusion replaces the kill notice.
    let mut outbox = match check_end_game(game, room_id) {
        Some(conclusion) => vec![conclusion],
        None => vec![game.broadcast(
            room_id,
            ServerToClient::PlayerKilled(PlayerKilledPacket {
                killer: killer_name,
                victim: victim_name,
            }),
        )],
    };

    outbox.push(game.roster_update(room_id));

    if game.room(room_id).tally.is_open() {
        outbox.push(voting::tally_update(game, room_id));
    }

    Ok(outbox)
}

/// Ends a running game once either team has no living members left.
pub(crate) fn check_end_game(game: &mut Game, room_id: &str) -> Option<OutgoingPacket> {
    if game.room(room_id).state != GameState::InProgress {
        return None;
    }

    let (impostors, crew) =
        game.living(room_id).fold((0, 0), |(impostors, crew), player| match player.player_type() {
            Some(PlayerType::Impostor) => (impostors + 1, crew),
            Some(PlayerType::Crew) => (impostors, crew + 1),
            None => (impostors, crew),
        });

    let conclusion = if impostors == 0 {
        GameConcludedPacket {
            winner: PlayerType::Crew,
            message: "Crewmates win! Every impostor has been eliminated.".to_string(),
        }
    } else if crew == 0 {
        GameConcludedPacket {
            winner: PlayerType::Impostor,
            message: "Impostors win! No crewmates remain.".to_string(),
        }
    } else {
        return None;
    };

    let room = game.room_mut(room_id);
    room.state = GameState::Concluded;
    room.tally.clear();

    info!("Room {:?} concluded, {:?} won", room_id, conclusion.winner);

    Some(game.broadcast(room_id, ServerToClient::GameConcluded(conclusion)))
}
