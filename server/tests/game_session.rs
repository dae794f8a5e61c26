//! Drives the game store the way the network loop does: one event at a time,
//! inspecting only what comes back out.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{collections::BTreeSet, net::SocketAddr};
use sus_common::{
    components::player::Position,
    network::{ClientToServer, PositionPacket, RoomPacket, ServerToClient},
    GameState, PlayerType,
};
use sus_server::{
    config::{EmptyRoomPolicy, GameConfig},
    events::{IncomingEvent, Outbox, PacketDestination},
    Game,
};

const NAMES: [&str; 6] = ["red", "blue", "green", "pink", "lime", "cyan"];

fn addr(n: usize) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], 7000 + n as u16))
}

fn send(game: &mut Game, n: usize, command: ClientToServer) -> Outbox {
    game.handle(IncomingEvent::command(addr(n), command))
}

fn errors(out: &Outbox) -> Vec<String> {
    out.iter()
        .filter_map(|packet| match &packet.packet {
            ServerToClient::Error(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Every roster matches exactly the registered players pointing at that room.
fn assert_indices_agree(game: &Game) {
    game.assert_consistent();

    for room in game.rooms().iter() {
        let roster: BTreeSet<_> = room.roster().iter().copied().collect();
        let registered: BTreeSet<_> = game
            .identities()
            .iter()
            .map(|(_, id)| *id)
            .filter(|id| game.players().get(*id).map(|p| p.room_id == room.id).unwrap_or(false))
            .collect();

        assert_eq!(roster, registered, "room {:?} disagrees with the registry", room.id);
    }
}

fn full_room(game: &mut Game, players: usize) {
    for n in 0..players {
        let packet = RoomPacket::new("skeld", "hunter2", NAMES[n]);
        let command =
            if n == 0 { ClientToServer::CreateRoom(packet) } else { ClientToServer::JoinRoom(packet) };
        assert!(errors(&send(game, n, command)).is_empty());
    }
}

#[test]
fn test_crew_votes_out_impostor_and_plays_again() {
    let mut game = Game::with_rng(GameConfig::default(), StdRng::seed_from_u64(11));
    full_room(&mut game, 5);

    let out = send(&mut game, 2, ClientToServer::StartGame);
    let dealt: Vec<_> = out
        .iter()
        .filter_map(|packet| match (&packet.destination, &packet.packet) {
            (PacketDestination::Single(to), ServerToClient::RoleAssigned(role)) => Some((*to, *role)),
            _ => None,
        })
        .collect();
    assert_eq!(dealt.len(), 5);

    let impostor = (0..5)
        .find(|n| game.player_by_addr(&addr(*n)).unwrap().is_impostor())
        .expect("one impostor among five");
    let impostor_name = NAMES[impostor];

    for voter in (0..5).filter(|n| *n != impostor) {
        let out = send(&mut game, voter, ClientToServer::Vote(impostor_name.to_string()));
        assert!(errors(&out).is_empty());
    }

    let out = send(&mut game, 0, ClientToServer::FinishVoting);
    assert_eq!(out[0].packet, ServerToClient::PlayerEliminated(impostor_name.to_string()));
    assert!(out.iter().any(|packet| matches!(
        &packet.packet,
        ServerToClient::GameConcluded(conclusion) if conclusion.winner == PlayerType::Crew
    )));
    assert_eq!(game.rooms().get("skeld").unwrap().state, GameState::Concluded);

    // The room stays together and can deal a fresh game.
    let out = send(&mut game, 4, ClientToServer::StartGame);
    assert!(errors(&out).is_empty());
    assert!(game.roster("skeld").iter().all(|p| p.is_alive() && p.role.is_some()));
    assert_eq!(game.rooms().get("skeld").unwrap().state, GameState::InProgress);
    assert_indices_agree(&game);
}

#[test]
fn test_late_joiner_waits_for_next_game() {
    let mut game = Game::with_rng(GameConfig::default(), StdRng::seed_from_u64(12));
    full_room(&mut game, 4);
    send(&mut game, 0, ClientToServer::StartGame);

    let out = send(&mut game, 5, ClientToServer::JoinRoom(RoomPacket::new("skeld", "hunter2", "cyan")));
    assert_eq!(errors(&out), vec!["a game is already in progress".to_string()]);
    assert!(game.player_by_addr(&addr(5)).is_none());
}

#[test]
fn test_role_never_leaks_into_room_broadcasts() {
    let mut game = Game::with_rng(GameConfig::default(), StdRng::seed_from_u64(13));
    full_room(&mut game, 6);

    let out = send(&mut game, 0, ClientToServer::StartGame);

    for packet in out {
        if let ServerToClient::RoleAssigned(_) = packet.packet {
            assert!(matches!(packet.destination, PacketDestination::Single(_)));
        }
    }
}

#[test]
fn test_random_traffic_keeps_indices_in_lock_step() {
    for (seed, empty_rooms) in [(1, EmptyRoomPolicy::Reap), (2, EmptyRoomPolicy::Keep)] {
        let config = GameConfig { kill_range: 40.0, empty_rooms, ..GameConfig::default() };
        let mut game = Game::with_rng(config, StdRng::seed_from_u64(seed));
        let mut rng = StdRng::seed_from_u64(seed + 100);

        for _ in 0..3_000 {
            let n = rng.gen_range(0..8);
            let room = if rng.gen_bool(0.7) { "skeld" } else { "polus" };
            let name = NAMES[rng.gen_range(0..NAMES.len())];
            let password = if rng.gen_bool(0.9) { "pw" } else { "nope" };

            let event = match rng.gen_range(0..12) {
                0 => ClientToServer::CreateRoom(RoomPacket::new(room, password, name)),
                1 | 2 => ClientToServer::JoinRoom(RoomPacket::new(room, password, name)),
                3 => ClientToServer::Rename(name.to_string()),
                4 => ClientToServer::StartGame,
                5 => ClientToServer::Kill,
                6 | 7 => ClientToServer::Vote(name.to_string()),
                8 => ClientToServer::FinishVoting,
                9 => ClientToServer::Move(vec![PositionPacket::new(
                    name,
                    Position::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)),
                )]),
                10 => ClientToServer::LeaveRoom,
                _ => {
                    game.handle(IncomingEvent::Disconnect { addr: addr(n) });
                    assert_indices_agree(&game);
                    continue;
                },
            };

            let out = send(&mut game, n, event);

            // Errors only ever go back to the caller.
            for packet in &out {
                if let ServerToClient::Error(_) = packet.packet {
                    assert_eq!(packet.destination, PacketDestination::Single(addr(n)));
                }
            }

            assert_indices_agree(&game);
        }
    }
}
