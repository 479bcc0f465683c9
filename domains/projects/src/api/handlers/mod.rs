//! API request handlers for the projects domain

pub mod export;
pub mod github;
pub mod vercel;
