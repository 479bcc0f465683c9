//! Request handlers for the Identity domain

pub mod github;
pub mod identity;
pub mod vercel;
