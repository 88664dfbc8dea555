//! Panel stitching
//!
//! Planning is a pure pass over probed panel widths; executing the plan is a
//! separate step that hands one copy or montage job per decision to a
//! [`CommandExecutor`](crate::external::CommandExecutor). Both run on the
//! calling thread, in panel order, so strip names come out the same on every
//! run.

pub mod executor;
pub mod planner;

pub use executor::{StitchExecutor, StitchLayout, StitchSummary};
pub use planner::{StitchConfig, StitchDecision, merged_name, plan};
