//! Pseudo-absence sampling for species distribution modeling.
//!
//! Presence-only occurrence data needs statistically usable background
//! ("pseudo-absence") points before a classifier can be trained. This
//! crate derives a candidate pool from a presence mask, region-coded
//! environment grid, optional habitat restriction and optional
//! sampling-bias weights, and draws a bounded sample from it.

pub mod observer;
pub mod pseudo_absence;

// Re-export commonly used items at crate root
pub use observer::{CollectingObserver, NullObserver, SampleEvent, SampleObserver};
pub use pseudo_absence::{
    sample_pseudo_absences, sample_pseudo_absences_default, SampleDiagnostics, SampleOutcome,
    SamplerInputs,
};
