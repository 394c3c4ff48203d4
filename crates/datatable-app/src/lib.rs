// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod labels;
pub mod model;
pub mod selection;
pub mod sort;
pub mod state;
pub mod view;
pub mod visibility;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use labels::*;
pub use model::*;
pub use selection::{Selection, SelectionMode};
pub use sort::*;
pub use state::*;
pub use view::*;
pub use visibility::*;
