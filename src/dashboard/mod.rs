pub mod handlers;
mod orchestrator;
mod view;

pub use orchestrator::{QueryState, SnapshotOrchestrator};
pub use view::DashboardView;
