//! ace-loop - Generate, Reflect, Curate
//!
//! Produces a ranked recommendation for a problem statement by running three
//! pluggable phases in sequence, and grows a context playbook of learned
//! patterns across cycles.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ace_loop::{AceAgent, Problem};
//!
//! let mut agent = AceAgent::sample();
//! let recommendation = agent.process_task(&Problem::new("Design a task queue"))?;
//! println!("{}", recommendation.primary_choice);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   solutions   ┌─────────┐   analyses   ┌────────┐
//! │ Generate │ ────────────▶ │ Reflect │ ───────────▶ │ Curate │ ──▶ recommendation
//! └──────────┘               └─────────┘              └────────┘
//!       ▲                         ▲                        │
//!       └──────── playbook ───────┴──── (read) ◀───────────┘ patterns_learned
//! ```
//!
//! Backends for each phase implement the traits in [`phases`]. The playbook
//! is read by every phase and only written once Curate has succeeded.

pub mod agent;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod phases;
pub mod playbook;
pub mod recommendation;
pub mod sample;
pub mod scoring;
pub mod types;

pub use agent::AceAgent;
pub use config::AceConfig;
pub use error::{CycleError, MissingField};
pub use orchestrator::{OrchestratorConfig, PhaseOrchestrator};
pub use phases::{CuratorBackend, SolutionGenerator, TradeoffReflector};
pub use playbook::{record_pattern, SharedPlaybook};
pub use types::*;
