//! Domain logic for the Canvas domain

pub mod reducer;
pub mod registry;
