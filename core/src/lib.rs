//! Last War: resource and mission simulation core.
//!
//! The engine owns one `GameState` and advances it on a tick clock:
//! buildings produce, days pass, and the mission board refills. Player
//! actions (upgrade, train, launch, scan, advise, reset) go through
//! `GameEngine::apply`. Every change is saved to a single SQLite slot
//! and recorded in an event log.

pub mod briefing;
pub mod building;
pub mod calendar_subsystem;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod journal;
pub mod mission;
pub mod name_generator;
pub mod narrative;
pub mod production_subsystem;
pub mod resources;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod subsystem;
pub mod types;
pub mod unit;
