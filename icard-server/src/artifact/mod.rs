//! I-Card artifact production
//!
//! Rendering runs after the issuing transaction has committed. A failed render
//! leaves `pdf_path` empty and the [`CardArtifactWorker`] picks the card up later.

mod renderer;
mod worker;

pub use renderer::{ArtifactError, CardRenderer, CardSheet, FileCardRenderer, produce_for_card};
pub use worker::CardArtifactWorker;
