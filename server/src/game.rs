use crate::{
    components::player::{Player, PlayerId},
    config::GameConfig,
    error::{SessionError, SessionResult},
    events::{IncomingEvent, OutgoingPacket, Outbox, PacketDestination},
    resources::{IdentityRegistry, PlayerIdCounter, Players, Room, RoomDirectory},
    systems::{kill, lobby, movement, roles, voting},
};
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use std::net::SocketAddr;
use sus_common::network::{ClientToServer, RosterPacket, ServerToClient};

/// The single owner of every room and player.
///
/// All mutation goes through [`Game::handle`], one event at a time, so each
/// read-modify-broadcast sequence runs to completion before the next event is
/// looked at. The network loop owns the only instance.
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) identities: IdentityRegistry,
    pub(crate) players: Players,
    pub(crate) rooms: RoomDirectory,
    pub(crate) player_ids: PlayerIdCounter,
    pub(crate) rng: StdRng,
}

/// A caller that made it through the session gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub player_id: PlayerId,
    pub room_id: String,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            identities: IdentityRegistry::default(),
            players: Players::default(),
            rooms: RoomDirectory::default(),
            player_ids: PlayerIdCounter::default(),
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rooms(&self) -> &RoomDirectory {
        &self.rooms
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn identities(&self) -> &IdentityRegistry {
        &self.identities
    }

    pub fn player_by_addr(&self, addr: &SocketAddr) -> Option<&Player> {
        self.identities.resolve(addr).and_then(|id| self.players.get(id))
    }

    /// Room members in join order.
    pub fn roster(&self, room_id: &str) -> Vec<&Player> {
        self.rooms
            .get(room_id)
            .map(|room| room.roster().iter().map(|id| self.player(*id)).collect())
            .unwrap_or_default()
    }

    /// Handles one inbound event and returns everything it produced.
    /// Rejections come back as a single error packet to the caller.
    pub fn handle(&mut self, event: IncomingEvent) -> Outbox {
        let addr = event.addr();

        let result = match event {
            IncomingEvent::Command { addr, command } => self.dispatch(addr, command),
            IncomingEvent::Disconnect { addr } => Ok(lobby::disconnect(self, addr)),
            IncomingEvent::Malformed { .. } => Err(SessionError::Malformed),
        };

        let outbox = result.unwrap_or_else(|err| {
            debug!("Rejected command from {}: {}", addr, err);
            vec![OutgoingPacket::to_single(addr, ServerToClient::Error(err.to_string()))]
        });

        if cfg!(debug_assertions) {
            self.assert_consistent();
        }

        outbox
    }

    fn dispatch(&mut self, addr: SocketAddr, command: ClientToServer) -> SessionResult<Outbox> {
        match command {
            ClientToServer::Connect(packet) => lobby::connect(addr, &packet),
            ClientToServer::CreateRoom(packet) => lobby::create_room(self, addr, packet),
            ClientToServer::JoinRoom(packet) => lobby::join_room(self, addr, packet),
            ClientToServer::Rename(name) => lobby::rename(self, addr, &name),
            ClientToServer::LeaveRoom => lobby::leave_room(self, addr),
            ClientToServer::Chat(text) => lobby::chat(self, addr, text),
            ClientToServer::StartGame => roles::start_game(self, addr),
            ClientToServer::Kill => kill::kill(self, addr),
            ClientToServer::Vote(target) => voting::vote(self, addr, &target),
            ClientToServer::FinishVoting => voting::finish_voting(self, addr),
            ClientToServer::Move(positions) => movement::move_players(self, addr, positions),
        }
    }

    /// Resolves a connection to its (player, room) pair.
    pub(crate) fn session(&self, addr: &SocketAddr) -> SessionResult<Session> {
        let player_id = self.identities.resolve(addr).ok_or(SessionError::NotInSession)?;
        let room_id = self.player(player_id).room_id.clone();
        // Make sure the room really exists before any system touches it.
        self.room(&room_id);

        Ok(Session { player_id, room_id })
    }

    pub(crate) fn player(&self, id: PlayerId) -> &Player {
        self.players.get(id).unwrap_or_else(|| panic!("player {} is indexed but not stored", id))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        self.players.get_mut(id).unwrap_or_else(|| panic!("player {} is indexed but not stored", id))
    }

    pub(crate) fn room(&self, id: &str) -> &Room {
        self.rooms.get(id).unwrap_or_else(|| panic!("room {:?} is referenced but missing", id))
    }

    pub(crate) fn room_mut(&mut self, id: &str) -> &mut Room {
        self.rooms.get_mut(id).unwrap_or_else(|| panic!("room {:?} is referenced but missing", id))
    }

    pub(crate) fn living(&self, room_id: &str) -> impl Iterator<Item = &Player> {
        self.room(room_id).roster().iter().map(move |id| self.player(*id)).filter(|p| p.is_alive())
    }

    pub(crate) fn room_destination(&self, room_id: &str) -> PacketDestination {
        PacketDestination::BroadcastToSet(
            self.room(room_id).roster().iter().map(|id| self.player(*id).addr).collect(),
        )
    }

    pub(crate) fn broadcast(&self, room_id: &str, packet: ServerToClient) -> OutgoingPacket {
        OutgoingPacket::reliable(self.room_destination(room_id), packet)
    }

    pub(crate) fn roster_update(&self, room_id: &str) -> OutgoingPacket {
        let players = self.roster(room_id).into_iter().map(Player::to_packet).collect();
        self.broadcast(room_id, ServerToClient::RosterUpdated(RosterPacket::new(players)))
    }

    /// Panics if the registry, the player store and the room rosters
    /// disagree about anyone. Any divergence is a bug in this crate.
    pub fn assert_consistent(&self) {
        assert_eq!(
            self.identities.len(),
            self.players.len(),
            "identity registry and player store differ in size"
        );

        for (addr, id) in self.identities.iter() {
            let player = self.player(*id);
            assert_eq!(&player.addr, addr, "player {} registered under a foreign address", id);
            assert!(
                self.room(&player.room_id).contains(*id),
                "player {} missing from the roster of {:?}",
                id,
                player.room_id
            );
        }

        for room in self.rooms.iter() {
            for id in room.roster() {
                assert_eq!(self.player(*id).room_id, room.id, "roster of {:?} lists a stranger", room.id);
            }

            for candidate in room.tally.candidates() {
                assert!(
                    room.contains(candidate) && self.player(candidate).is_alive(),
                    "vote tally of {:?} offers a player who cannot be voted for",
                    room.id
                );
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sus_common::{
        components::player::{Position, Role},
        network::RoomPacket,
    };

    pub fn addr(n: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 9000 + n))
    }

    pub fn seeded_game(config: GameConfig) -> Game {
        Game::with_rng(config, StdRng::seed_from_u64(7))
    }

    pub fn send(game: &mut Game, n: u16, command: ClientToServer) -> Outbox {
        game.handle(IncomingEvent::command(addr(n), command))
    }

    /// Creates "skeld" with `names[0]` and joins the rest, connection i for name i.
    pub fn room_with(game: &mut Game, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let packet = RoomPacket::new("skeld", "pw", name);
            let command = if i == 0 {
                ClientToServer::CreateRoom(packet)
            } else {
                ClientToServer::JoinRoom(packet)
            };
            let out = send(game, i as u16, command);
            assert!(errors(&out).is_empty(), "{} could not enter: {:?}", name, out);
        }
    }

    /// Starts the game in "skeld", then overrides the random deal so that
    /// exactly the listed connections are impostors.
    pub fn start_with_impostors(game: &mut Game, impostors: &[u16]) {
        let out = send(game, 0, ClientToServer::StartGame);
        assert!(errors(&out).is_empty(), "start failed: {:?}", out);

        let members: Vec<_> = game.roster("skeld").iter().map(|p| (p.id, p.addr)).collect();
        for (id, player_addr) in members {
            let role = if impostors.iter().any(|n| addr(*n) == player_addr) {
                Role::Impostor
            } else {
                Role::Engineer
            };
            game.player_mut(id).role = Some(role);
        }
    }

    pub fn place(game: &mut Game, n: u16, x: f32, y: f32) {
        let id = game.identities.resolve(&addr(n)).unwrap();
        game.player_mut(id).pos = Position::new(x, y);
    }

    pub fn errors(out: &Outbox) -> Vec<&str> {
        out.iter()
            .filter_map(|packet| match &packet.packet {
                ServerToClient::Error(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_malformed_payload_is_reported_to_sender_only() {
        let mut game = seeded_game(GameConfig::default());
        let out = game.handle(IncomingEvent::Malformed { addr: addr(3) });

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].destination, PacketDestination::Single(addr(3)));
        assert_eq!(errors(&out), vec!["malformed message"]);
    }

    #[test]
    fn test_unbound_connection_is_not_in_session() {
        let mut game = seeded_game(GameConfig::default());

        for command in [ClientToServer::Kill, ClientToServer::StartGame, ClientToServer::FinishVoting] {
            let out = send(&mut game, 1, command);
            assert_eq!(errors(&out), vec!["you are not in a game"]);
        }
        assert!(game.rooms().is_empty());
    }

    #[test]
    fn test_roster_broadcast_reaches_room_members_only() {
        let mut game = seeded_game(GameConfig::default());
        room_with(&mut game, &["red", "blue"]);
        send(&mut game, 5, ClientToServer::CreateRoom(RoomPacket::new("polus", "pw", "green")));

        let update = game.roster_update("skeld");
        assert!(update.destination.includes(&addr(0)));
        assert!(update.destination.includes(&addr(1)));
        assert!(!update.destination.includes(&addr(5)));
    }

    #[test]
    #[should_panic(expected = "missing from the roster")]
    fn test_divergent_indices_fail_fast() {
        let mut game = seeded_game(GameConfig::default());
        room_with(&mut game, &["red", "blue"]);

        let id = game.identities.resolve(&addr(1)).unwrap();
        game.room_mut("skeld").remove(id);
        game.assert_consistent();
    }
}
