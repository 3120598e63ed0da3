//! Family Assist server library.
//!
//! Wires the reference data, prompt builder and completion client behind
//! the `POST /ask` endpoint.

pub mod api;
pub mod ask;
pub mod state;

pub use api::create_app;
pub use ask::{answer_question, AskRequest, AskResponse, COMPLETION_TEMPERATURE};
pub use state::AppState;
