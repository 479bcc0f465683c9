//! API request handlers for the threads domain

pub mod canvas;
pub mod threads;
