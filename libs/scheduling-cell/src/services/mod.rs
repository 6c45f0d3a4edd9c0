pub mod engine;
pub mod intervals;
pub mod pipeline;
pub mod qualification;
pub mod slots;

pub use engine::SlotEngine;
