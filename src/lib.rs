//! Road Rash: Sentience client-side race simulation
//!
//! Advances player and rival rider state every frame, runs the rival
//! maneuvering logic, resolves collisions, tracks race progress, and keeps a
//! best-effort message channel to the narrative service. The renderer and
//! page chrome consume the per-tick [`net::protocol::RenderSnapshot`]; the
//! simulation itself never blocks on connectivity.

pub mod config;
pub mod util;
pub mod game;
pub mod net;
