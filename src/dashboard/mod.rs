//! Dashboard state and the controller that keeps it fresh.

pub mod controller;
pub mod state;
pub mod ticker;

pub use controller::{ControllerSettings, RefreshController, RefreshOutcome};
pub use state::{DashboardState, Phase, StateView};
pub use ticker::Ticker;
