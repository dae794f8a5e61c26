use std::net::SocketAddr;
use sus_common::network::{ClientToServer, DeliveryType, ServerToClient, CHAT_STREAM, INPUT_STREAM};

/// What the network layer hands the game loop for one connection.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingEvent {
    Command { addr: SocketAddr, command: ClientToServer },
    /// A packet arrived that did not decode into a known command.
    Malformed { addr: SocketAddr },
    /// The transport lost the connection (explicit disconnect or timeout).
    Disconnect { addr: SocketAddr },
}

impl IncomingEvent {
    pub fn command(addr: SocketAddr, command: ClientToServer) -> Self {
        Self::Command { addr, command }
    }

    pub fn addr(&self) -> SocketAddr {
        match self {
            Self::Command { addr, .. } | Self::Malformed { addr } | Self::Disconnect { addr } => {
                *addr
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketDestination {
    Single(SocketAddr),
    /// Every member of a room, snapshotted when the packet was produced.
    BroadcastToSet(Vec<SocketAddr>),
}

impl PacketDestination {
    pub fn includes(&self, addr: &SocketAddr) -> bool {
        match self {
            PacketDestination::Single(single) => single == addr,
            PacketDestination::BroadcastToSet(addrs) => addrs.contains(addr),
        }
    }

    pub fn addrs(&self) -> &[SocketAddr] {
        match self {
            PacketDestination::Single(addr) => std::slice::from_ref(addr),
            PacketDestination::BroadcastToSet(addrs) => addrs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingPacket {
    pub destination: PacketDestination,
    pub packet: ServerToClient,
    pub delivery_type: DeliveryType,
    pub stream_id: Option<u8>,
}

impl OutgoingPacket {
    pub fn new(
        destination: PacketDestination,
        packet: ServerToClient,
        delivery_type: DeliveryType,
        stream_id: Option<u8>,
    ) -> Self {
        Self { destination, packet, delivery_type, stream_id }
    }

    pub fn reliable(destination: PacketDestination, packet: ServerToClient) -> Self {
        Self::new(destination, packet, DeliveryType::ReliableOrdered, None)
    }

    pub fn to_single(addr: SocketAddr, packet: ServerToClient) -> Self {
        Self::reliable(PacketDestination::Single(addr), packet)
    }

    /// Movement is superseded by the next update, so older ones may be dropped.
    pub fn positions(destination: PacketDestination, packet: ServerToClient) -> Self {
        Self::new(destination, packet, DeliveryType::UnreliableSequenced, Some(INPUT_STREAM))
    }

    pub fn chat(destination: PacketDestination, packet: ServerToClient) -> Self {
        Self::new(destination, packet, DeliveryType::ReliableOrdered, Some(CHAT_STREAM))
    }
}

pub type Outbox = Vec<OutgoingPacket>;
