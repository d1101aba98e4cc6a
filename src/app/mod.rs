//! Application layer: service decorators and shared state.

pub mod instrumented;
pub mod state;
pub mod validation;

pub use instrumented::InstrumentedService;
pub use state::AppState;
pub use validation::ValidationMiddleware;
