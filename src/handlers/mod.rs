// src/handlers/mod.rs

pub mod attempt;
pub mod auth;
pub mod leaderboard;
pub mod quiz;
