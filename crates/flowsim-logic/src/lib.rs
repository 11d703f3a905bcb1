//! Pure allocation and flow-diagram logic for FlowSim.
//!
//! This crate contains everything that is independent of a window or a
//! dashboard framework. Functions take plain data and return results, so
//! the interactive viewer, the headless harness and any future front end
//! all share one implementation.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`allocation`] | Value split between labor/automation and public/elites |
//! | [`config`] | Simulation inputs and the dashboard control ranges |
//! | [`constants`] | Economic constants, node layout and palette |
//! | [`diagram`] | Fixed five-node, four-flow topology with derived weights |
//! | [`figure`] | Drawable primitives composed from a diagram |
//! | [`policy`] | The three allocation regimes and their names |
//! | [`svg`] | Standalone SVG export of a figure |
//!
//! ```
//! use flowsim_logic::allocation::{allocate, PolicyStatus};
//! use flowsim_logic::config::SimulationInputs;
//!
//! let result = allocate(&SimulationInputs::default());
//! assert_eq!(result.status, PolicyStatus::Standard);
//! assert_eq!(result.public_allocation, 825.0);
//! assert_eq!(result.elite_surplus, 675.0);
//! ```

pub mod allocation;
pub mod config;
pub mod constants;
pub mod diagram;
pub mod figure;
pub mod policy;
pub mod svg;
