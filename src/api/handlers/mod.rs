// src/api/handlers/mod.rs
mod assets;
mod form;
mod health;
mod state;

pub use assets::static_asset;
pub use form::{index, submit_form};
pub use health::health_check;
pub use state::{get_state, submit, update_field, FieldUpdate};
