//! Progress/diagnostic event sink for long-running sampling.
//!
//! The sampler reports phase events through an injected observer instead
//! of a global logger, keeping the core side-effect-free and testable.

/// Phase events emitted while sampling pseudo-absences.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleEvent {
    /// Inputs validated; sampling begins.
    Started { requested: usize },
    /// Region codes that co-occur with at least one presence cell.
    EligibleRegions { regions: Vec<f64> },
    /// No region overlaps any presence; nothing to sample.
    NothingToSample,
    /// Size of the bias-weighted candidate pool.
    BiasPool { available: usize },
    /// All bias-pool cells taken deterministically; `remaining` points
    /// are still to be drawn from the unweighted pool.
    BiasTookAll { taken: usize, remaining: usize },
    /// Top-k bias-weighted cells taken; sampling ends here.
    BiasTopK { taken: usize },
    /// Size of the unweighted candidate pool before the random draw.
    CandidatePool { available: usize },
    /// The pool is empty; no further sampling is possible.
    PoolExhausted,
    /// Fewer candidates than requested; all of them were taken.
    Undersupplied { available: usize, requested: usize },
    /// Sampling finished with this many cells marked in total.
    Finished { taken: usize },
}

/// Sink for [`SampleEvent`]s.
pub trait SampleObserver {
    fn event(&mut self, event: SampleEvent);
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SampleObserver for NullObserver {
    fn event(&mut self, _event: SampleEvent) {}
}

/// Observer that records events for inspection (used by tests and
/// batch drivers that want a run report).
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    pub events: Vec<SampleEvent>,
}

impl SampleObserver for CollectingObserver {
    fn event(&mut self, event: SampleEvent) {
        self.events.push(event);
    }
}
