//! Core domain logic for the projects domain

pub mod archive;
pub mod materializer;
