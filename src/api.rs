//! HTTP surface: chat widget, persona info and the chat endpoint

mod assets;
mod handlers;
pub mod history;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::dispatch::Dispatcher;
use crate::persona::Persona;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub persona: Arc<Persona>,
    /// Built once from the persona; identical for every turn
    pub system_prompt: Arc<str>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, persona: Persona) -> Self {
        let system_prompt: Arc<str> = persona.system_prompt().into();
        Self {
            dispatcher,
            persona: Arc::new(persona),
            system_prompt,
        }
    }
}
