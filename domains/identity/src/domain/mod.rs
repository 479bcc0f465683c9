//! Domain logic for the Identity domain

pub mod connection;
pub mod state;
