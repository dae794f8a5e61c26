//! Command handlers: plain functions over [`crate::Game`] that return the packets to send.

pub mod kill;
pub mod lobby;
pub mod movement;
pub mod network;
pub mod roles;
pub mod voting;
