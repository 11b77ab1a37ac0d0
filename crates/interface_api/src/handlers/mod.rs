//! Route handlers

pub mod fees;
pub mod health;
