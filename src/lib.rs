//! Terminal test-case manager.
//!
//! The [`simulator`] module holds the step-execution logic and can be used on
//! its own; everything else is the terminal front end around it.

pub mod app;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod models;
pub mod simulator;
pub mod ui;

pub use catalog::{CaseFilter, Catalog};
pub use error::{CatalogError, SimulatorError};
pub use simulator::{ExecutionState, IdentifierSource, StepExecutionSimulator};
