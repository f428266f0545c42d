//! Flash command families layered over the transport contract

pub mod opcodes;
pub mod s25;
