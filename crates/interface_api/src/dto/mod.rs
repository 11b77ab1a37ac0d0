//! Request and response bodies

pub mod fees;
