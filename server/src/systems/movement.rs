use crate::{
    components::player::Player,
    error::{Precondition, SessionResult},
    events::{OutgoingPacket, Outbox},
    game::Game,
};
use log::warn;
use std::net::SocketAddr;
use sus_common::network::{PositionPacket, RosterPacket, ServerToClient};

/// Applies reported positions to living players of the caller's room and
/// echoes the living players' positions back to the room.
pub fn move_players(
    game: &mut Game,
    addr: SocketAddr,
    positions: Vec<PositionPacket>,
) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;
    let room_id = session.room_id.as_str();

    let caller = game.player(session.player_id);

    if !caller.is_alive() {
        return Err(Precondition::DeadPlayer("move").into());
    }

    let (caller_id, caller_name) = (caller.id, caller.name.clone());

    for PositionPacket { name, pos } in positions {
        if !pos.is_finite() {
            warn!("Dropping non-finite position for {} from {}", name, addr);
            continue;
        }

        // Names are not unique, so the caller's own name always means the caller.
        let target = if name == caller_name {
            Some(caller_id)
        } else {
            game.living(room_id)
                .find(|player| player.id != caller_id && player.name == name)
                .map(|player| player.id)
        };

        if let Some(id) = target {
            game.player_mut(id).pos = pos;
        }
    }

    let players = game.living(room_id).map(Player::to_packet).collect();

    Ok(vec![OutgoingPacket::positions(
        game.room_destination(room_id),
        ServerToClient::PositionsUpdated(RosterPacket::new(players)),
    )])
}
