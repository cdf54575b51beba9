//! Match state machine: claim arbitration and stage transitions.

pub mod claims;
pub mod transitions;

pub use claims::{ClaimBoard, Resolution};
pub use transitions::{DealOutcome, DrawOutcome, MatchMachine};
