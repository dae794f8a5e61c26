use crate::{
    config::Config,
    events::{IncomingEvent, OutgoingPacket},
    game::Game,
};
use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use std::thread::JoinHandle;
use sus_common::{
    laminar::{Packet, Socket, SocketEvent},
    network::{decode, encode, make_packet, ClientToServer},
};

pub struct NetworkThread(pub JoinHandle<()>);
pub struct NetTx(pub Sender<Packet>);
pub struct NetRx(pub Receiver<SocketEvent>);

pub fn initialize_network(config: &Config) -> Result<Socket> {
    let socket = Socket::bind_with_config(config.bind, config.network_config())
        .map_err(|e| anyhow!("couldn't bind to {}: {:?}", config.bind, e))?;

    info!("Listening on {}", config.bind);

    Ok(socket)
}

pub fn spawn_network(mut socket: Socket) -> (NetworkThread, NetTx, NetRx) {
    let (net_tx, net_rx) = (socket.get_packet_sender(), socket.get_event_receiver());
    let network_thread = std::thread::spawn(move || socket.start_polling());

    (NetworkThread(network_thread), NetTx(net_tx), NetRx(net_rx))
}

/// Serves rooms until the socket thread goes away. This loop is the only
/// place game state is touched, so events are handled strictly one at a time.
pub fn run(config: &Config) -> Result<()> {
    let socket = initialize_network(config)?;
    let (network_thread, net_tx, net_rx) = spawn_network(socket);

    let mut game = Game::new(config.game_config());
    info!("Game rules: {:?}", game.config());

    for event in net_rx.0.iter() {
        if let Some(incoming) = network_receive(event) {
            let outgoing = game.handle(incoming);
            network_send(&net_tx, outgoing);
        }
    }

    network_thread.0.join().map_err(|_| anyhow!("network thread panicked"))?;

    Ok(())
}

/// Turns a raw socket event into something the game understands.
pub fn network_receive(event: SocketEvent) -> Option<IncomingEvent> {
    match event {
        SocketEvent::Packet(packet) => {
            let addr = packet.addr();

            match decode::<ClientToServer>(packet.payload()) {
                Ok(command) => Some(IncomingEvent::Command { addr, command }),
                Err(e) => {
                    warn!("Received an invalid packet from {}: {}", addr, e);
                    Some(IncomingEvent::Malformed { addr })
                },
            }
        },
        SocketEvent::Connect(addr) => {
            debug!("Client connected: {}", addr);
            None
        },
        SocketEvent::Timeout(addr) => {
            info!("Client timed out: {}", addr);
            Some(IncomingEvent::Disconnect { addr })
        },
        SocketEvent::Disconnect(addr) => {
            info!("Client disconnected: {}", addr);
            Some(IncomingEvent::Disconnect { addr })
        },
    }
}

/// Fire-and-forget: nothing waits for delivery.
pub fn network_send(net_tx: &NetTx, outgoing: Vec<OutgoingPacket>) {
    for packet in outgoing_packets(outgoing) {
        if let Err(e) = net_tx.0.send(packet) {
            warn!("Failed to send packet: {:?}", e);
        }
    }
}

/// Encodes each message once and fans it out to its destinations.
pub fn outgoing_packets(outgoing: Vec<OutgoingPacket>) -> Vec<Packet> {
    let mut packets = Vec::new();

    for outgoing in outgoing {
        let data = match encode(&outgoing.packet) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to encode {:?}: {}", outgoing.packet, e);
                continue;
            },
        };

        // laminar packets take a Vec<u8> instead of a slice, so every recipient
        // gets its own copy.
        packets.extend(outgoing.destination.addrs().iter().map(|addr| {
            make_packet(outgoing.delivery_type, data.clone(), *addr, outgoing.stream_id)
        }));
    }

    packets
}
