//! Pseudo-absence sampling.
//!
//! Derives statistically usable background points from a species
//! presence mask, a region-coded environment grid, an optional habitat
//! restriction and an optional sampling-bias weighting. The region codes
//! that co-occur with presences decide where background points may fall;
//! presence cells themselves are excluded.

use rand::Rng;

use sdm_common::{Band, Result, SdmError};

use crate::observer::{NullObserver, SampleEvent, SampleObserver};

/// Inputs to one sampling run. All grids must share one shape.
#[derive(Debug, Clone, Copy)]
pub struct SamplerInputs<'a> {
    /// Binary {0,1} presence mask. Required, strictly validated.
    pub presence: &'a Band,
    /// Integer-coded regions (realms/ecoregions); 0 and the nodata
    /// sentinel mean unusable.
    pub regions: &'a Band,
    /// Nodata sentinel of the regions grid, normalized to 0 before use.
    pub regions_nodata: f64,
    /// Optional binary habitat restriction (1 = eligible).
    pub habitat: Option<&'a Band>,
    /// Optional nonnegative sampling-intensity weights.
    pub bias: Option<&'a Band>,
}

/// Counters describing how a sampling run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleDiagnostics {
    pub requested: usize,
    /// Cells taken deterministically or by top-k from the bias pool.
    pub taken_from_bias: usize,
    /// Cells drawn uniformly from the unweighted pool.
    pub taken_uniform: usize,
    /// Requested minus taken; nonzero when the pool ran dry.
    pub shortfall: usize,
}

impl SampleDiagnostics {
    pub fn taken(&self) -> usize {
        self.taken_from_bias + self.taken_uniform
    }
}

/// Result of a sampling run: the fully filtered candidate pool (a
/// diagnostic value) and the sampled subset actually used as
/// pseudo-absence points. Sampled cells carry their region code.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub pool: Band,
    pub sampled: Band,
    pub diagnostics: SampleDiagnostics,
}

/// Sample up to `count` pseudo-absence cells.
///
/// Under-supply degrades gracefully: an empty or too-small candidate
/// pool yields a smaller (possibly empty) sample with a diagnostic,
/// never an error. Validation failures (non-binary presence, shape
/// mismatch) are raised before any heavy work.
///
/// With a bias grid, up to `count` weighted cells are taken first. When
/// the bias pool exceeds `count`, the `count` highest-weight cells win
/// (ties broken by ascending cell index, so identical inputs reproduce
/// identical output) and the unweighted pool is never consulted.
pub fn sample_pseudo_absences<R: Rng + ?Sized>(
    inputs: &SamplerInputs<'_>,
    count: usize,
    rng: &mut R,
    observer: &mut dyn SampleObserver,
) -> Result<SampleOutcome> {
    validate(inputs)?;
    observer.event(SampleEvent::Started { requested: count });
    tracing::debug!(requested = count, "sampling pseudo-absence points");

    let mut diagnostics = SampleDiagnostics {
        requested: count,
        ..Default::default()
    };

    // Normalize region nodata to 0 so it can never become eligible.
    let mut regions = inputs.regions.clone();
    regions.replace(inputs.regions_nodata, 0.0);

    // Region codes that co-occur with at least one presence cell.
    let overlap = regions.multiply(inputs.presence)?;
    let eligible = overlap.unique_nonzero();
    observer.event(SampleEvent::EligibleRegions {
        regions: eligible.clone(),
    });
    if eligible.is_empty() {
        tracing::debug!("no regions overlap the presence mask");
        observer.event(SampleEvent::NothingToSample);
        let zeros = Band::zeros_like(inputs.presence);
        return Ok(SampleOutcome {
            pool: zeros.clone(),
            sampled: zeros,
            diagnostics,
        });
    }

    // Candidate cells: all cells of the eligible regions, minus the
    // presences themselves. `eligible` is sorted, so membership is a
    // binary search.
    let mut pool = Band::zeros_like(&regions);
    for index in 0..regions.len() {
        let code = regions.get_flat(index);
        if code != 0.0
            && eligible
                .binary_search_by(|v| v.partial_cmp(&code).expect("NaN region code"))
                .is_ok()
        {
            pool.set_flat(index, code);
        }
    }
    drop(regions);
    pool.subtract_in_place(&overlap)?;
    drop(overlap);

    if let Some(habitat) = inputs.habitat {
        pool.multiply_in_place(habitat)?;
    }

    let mut sampled = Band::zeros_like(&pool);
    let mut remaining = count;

    if let Some(bias) = inputs.bias {
        let bias_pool: Vec<usize> =
            pool.positions_where(|v| v > 0.0)
                .into_iter()
                .filter(|&i| bias.get_flat(i) > 0.0)
                .collect();
        let available = bias_pool.len();
        observer.event(SampleEvent::BiasPool { available });
        tracing::debug!(available, "bias-weighted candidate cells");

        if available > remaining {
            // Top-k by weight; the unweighted pool is never consulted on
            // this branch.
            let mut by_weight = bias_pool;
            by_weight.sort_by(|&a, &b| {
                bias.get_flat(b)
                    .partial_cmp(&bias.get_flat(a))
                    .expect("NaN bias weight")
                    .then(a.cmp(&b))
            });
            for &index in by_weight.iter().take(remaining) {
                sampled.set_flat(index, pool.get_flat(index));
            }
            diagnostics.taken_from_bias = remaining;
            observer.event(SampleEvent::BiasTopK { taken: remaining });
            observer.event(SampleEvent::Finished {
                taken: diagnostics.taken(),
            });
            return Ok(SampleOutcome {
                pool,
                sampled,
                diagnostics,
            });
        }

        if available > 0 {
            // Take every weighted cell deterministically and keep going
            // with whatever count is left.
            for &index in &bias_pool {
                sampled.set_flat(index, pool.get_flat(index));
                pool.set_flat(index, 0.0);
            }
            diagnostics.taken_from_bias = available;
            remaining -= available;
            observer.event(SampleEvent::BiasTookAll {
                taken: available,
                remaining,
            });
        }
    }

    let candidates = pool.positions_where(|v| v > 0.0);
    let available = candidates.len();
    observer.event(SampleEvent::CandidatePool { available });
    tracing::debug!(available, remaining, "unweighted candidate cells");

    if available == 0 {
        if remaining > 0 {
            tracing::warn!(
                "no cells left to sample from; the presence mask may cover the entire eligible area"
            );
            observer.event(SampleEvent::PoolExhausted);
            diagnostics.shortfall = remaining;
        }
        observer.event(SampleEvent::Finished {
            taken: diagnostics.taken(),
        });
        return Ok(SampleOutcome {
            pool,
            sampled,
            diagnostics,
        });
    }

    if available < remaining {
        // Deterministic: everything left is taken.
        observer.event(SampleEvent::Undersupplied {
            available,
            requested: remaining,
        });
        for &index in &candidates {
            sampled.set_flat(index, pool.get_flat(index));
        }
        diagnostics.taken_uniform = available;
        diagnostics.shortfall = remaining - available;
    } else if remaining > 0 {
        // Distinct positions, equal probability, no replacement.
        let chosen = rand::seq::index::sample(rng, available, remaining);
        for position in chosen.iter() {
            let index = candidates[position];
            sampled.set_flat(index, pool.get_flat(index));
        }
        diagnostics.taken_uniform = remaining;
    }

    observer.event(SampleEvent::Finished {
        taken: diagnostics.taken(),
    });
    Ok(SampleOutcome {
        pool,
        sampled,
        diagnostics,
    })
}

/// [`sample_pseudo_absences`] with a thread-local RNG and no observer.
pub fn sample_pseudo_absences_default(
    inputs: &SamplerInputs<'_>,
    count: usize,
) -> Result<SampleOutcome> {
    sample_pseudo_absences(inputs, count, &mut rand::thread_rng(), &mut NullObserver)
}

fn validate(inputs: &SamplerInputs<'_>) -> Result<()> {
    if !inputs.presence.values_are_exactly(&[0.0, 1.0]) {
        return Err(SdmError::validation(
            "presence mask must contain exactly the values 0 and 1",
        ));
    }
    let shape = inputs.presence.shape();
    if inputs.regions.shape() != shape {
        return Err(SdmError::shape_mismatch(shape, inputs.regions.shape()));
    }
    if let Some(habitat) = inputs.habitat {
        if habitat.shape() != shape {
            return Err(SdmError::shape_mismatch(shape, habitat.shape()));
        }
    }
    if let Some(bias) = inputs.bias {
        if bias.shape() != shape {
            return Err(SdmError::shape_mismatch(shape, bias.shape()));
        }
    }
    Ok(())
}
