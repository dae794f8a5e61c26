use crate::{
    components::player::{Player, PlayerId},
    config::EmptyRoomPolicy,
    error::{Precondition, SessionError, SessionResult},
    events::{OutgoingPacket, Outbox},
    game::Game,
    resources::Room,
    systems::{kill, voting},
};
use log::{debug, info};
use std::net::SocketAddr;
use sus_common::{
    network::{ChatPacket, ConnectPacket, RoomPacket, ServerToClient, GAME_VERSION},
    GameState,
};

pub fn connect(addr: SocketAddr, packet: &ConnectPacket) -> SessionResult<Outbox> {
    if packet.version != GAME_VERSION {
        return Err(Precondition::VersionMismatch {
            expected: GAME_VERSION,
            received: packet.version,
        }
        .into());
    }

    info!("{} (ip = {}) connected with game version {}", packet.name, addr, packet.version);

    Ok(vec![OutgoingPacket::to_single(addr, ServerToClient::ConnectAck)])
}

pub fn create_room(game: &mut Game, addr: SocketAddr, packet: RoomPacket) -> SessionResult<Outbox> {
    let name = validate_name(&packet.name)?;
    ensure_unbound(game, &addr)?;

    let RoomPacket { room_id, password, .. } = packet;

    if room_id.trim().is_empty() {
        return Err(Precondition::EmptyRoomId.into());
    }

    // An existing id is never taken over, even if the room is empty.
    if game.rooms.contains(&room_id) {
        return Err(SessionError::RoomConflict(room_id));
    }

    let id = allocate_id(game);
    game.players.insert(Player::new(id, addr, name.clone(), room_id.clone()));
    game.rooms.insert(Room::new(room_id.clone(), password, id));
    bind(game, addr, id);

    info!("{} created room {:?}", name, room_id);

    Ok(vec![
        game.broadcast(&room_id, ServerToClient::Notice(format!("{} created room {}", name, room_id))),
        game.roster_update(&room_id),
    ])
}

pub fn join_room(game: &mut Game, addr: SocketAddr, packet: RoomPacket) -> SessionResult<Outbox> {
    let name = validate_name(&packet.name)?;
    ensure_unbound(game, &addr)?;

    let room_id = packet.room_id;
    let room = game.rooms.get(&room_id).ok_or_else(|| SessionError::RoomNotFound(room_id.clone()))?;

    if !room.password_matches(&packet.password) {
        return Err(SessionError::AccessDenied);
    }

    if room.state == GameState::InProgress {
        return Err(Precondition::GameInProgress.into());
    }

    if room.len() >= game.config.max_players {
        return Err(Precondition::RoomFull(game.config.max_players).into());
    }

    let id = allocate_id(game);
    game.players.insert(Player::new(id, addr, name.clone(), room_id.clone()));
    game.room_mut(&room_id).add(id);
    bind(game, addr, id);

    info!("{} joined room {:?}", name, room_id);

    Ok(vec![
        game.broadcast(&room_id, ServerToClient::Notice(format!("{} joined the room", name))),
        game.roster_update(&room_id),
    ])
}

/// Changes the display label only. Names are not unique and never act as keys.
pub fn rename(game: &mut Game, addr: SocketAddr, new_name: &str) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;
    let name = validate_name(new_name)?;

    let old_name = std::mem::replace(&mut game.player_mut(session.player_id).name, name.clone());
    info!("{} renamed to {} in room {:?}", old_name, name, session.room_id);

    let room_id = &session.room_id;
    let mut outbox = vec![
        game.broadcast(
            room_id,
            ServerToClient::Notice(format!("{} is now known as {}", old_name, name)),
        ),
        game.roster_update(room_id),
    ];

    if game.room(room_id).tally.is_open() {
        outbox.push(voting::tally_update(game, room_id));
    }

    Ok(outbox)
}

pub fn leave_room(game: &mut Game, addr: SocketAddr) -> SessionResult<Outbox> {
    game.session(&addr)?;
    Ok(remove_player(game, addr))
}

/// Transport-initiated teardown. Unknown connections are ignored.
pub fn disconnect(game: &mut Game, addr: SocketAddr) -> Outbox {
    if game.identities.resolve(&addr).is_none() {
        debug!("Unknown player disconnected: {}", addr);
        return Vec::new();
    }

    remove_player(game, addr)
}

pub fn chat(game: &mut Game, addr: SocketAddr, text: String) -> SessionResult<Outbox> {
    let session = game.session(&addr)?;

    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let from = game.player(session.player_id).name.clone();
    let packet = ServerToClient::Chat(ChatPacket { from, text: text.to_string() });

    Ok(vec![OutgoingPacket::chat(game.room_destination(&session.room_id), packet)])
}

fn remove_player(game: &mut Game, addr: SocketAddr) -> Outbox {
    let id = match game.identities.unbind(&addr) {
        Some(id) => id,
        None => return Vec::new(),
    };

    let player = game.players.remove(id).unwrap_or_else(|| panic!("player {} was bound but not stored", id));
    let room_id = player.room_id;
    let policy = game.config.empty_rooms;

    let room = game.room_mut(&room_id);
    let removed = room.remove(id);
    assert!(removed, "player {} was not on the roster of {:?}", id, room_id);

    info!("{} ({}) left room {:?}", player.name, addr, room_id);

    if room.is_empty() {
        match policy {
            EmptyRoomPolicy::Reap => {
                game.rooms.remove(&room_id);
                info!("Reaped empty room {:?}", room_id);
            },
            EmptyRoomPolicy::Keep => {
                room.state = GameState::Lobby;
                room.tally.clear();
            },
        }

        return Vec::new();
    }

    let mut outbox = vec![
        game.broadcast(&room_id, ServerToClient::Notice(format!("{} left the room", player.name))),
        game.roster_update(&room_id),
    ];

    if game.room(&room_id).tally.is_open() {
        outbox.push(voting::tally_update(game, &room_id));
    }

    outbox.extend(kill::check_end_game(game, &room_id));
    outbox
}

fn validate_name(name: &str) -> SessionResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Precondition::EmptyName.into());
    }

    Ok(name.to_string())
}

fn ensure_unbound(game: &Game, addr: &SocketAddr) -> SessionResult<()> {
    match game.identities.resolve(addr) {
        Some(_) => Err(Precondition::AlreadyInRoom.into()),
        None => Ok(()),
    }
}

fn allocate_id(game: &mut Game) -> PlayerId {
    loop {
        let id = game.player_ids.next_id();
        if game.players.get(id).is_none() {
            return id;
        }
    }
}

fn bind(game: &mut Game, addr: SocketAddr, id: PlayerId) {
    let previous = game.identities.bind(addr, id);
    assert!(previous.is_none(), "{} was already bound to player {:?}", addr, previous);
}
