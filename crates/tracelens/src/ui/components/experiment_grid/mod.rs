mod columns;
mod events;
mod grid;
mod pagination;
mod row_cache;
mod selection;
mod sizing;
mod state;
mod theme;
mod toolbar;

pub use events::GridEvent;
pub use grid::{ExperimentGrid, init};
pub use state::ExperimentGridState;
