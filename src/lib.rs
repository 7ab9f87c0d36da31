//! Night Shift - security office survival simulation

pub mod core;
pub mod night;
pub mod schedule;
pub mod scoring;
