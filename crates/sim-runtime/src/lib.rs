#![deny(warnings)]

//! Simulation runtime: the quarter engine, its result ledger, scenario
//! presets and a session store for hosting many games side by side.

pub mod engine;
pub mod ledger;
pub mod scenario;
pub mod session;

pub use engine::{advance_quarter, Engine, Transition};
pub use ledger::{Export, Ledger, LedgerError, Rating, Summary};
pub use scenario::{compare_presets, Preset, Scenario};
pub use session::{SessionError, SessionId, SessionStore, SimulateOutcome};
