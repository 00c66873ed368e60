//! Time-dependent (semi-Markov) chain with Weibull sojourn times.
//!
//! The jump targets come from the discrete chain's renormalized exit
//! distribution; the holding time in each compartment is Weibull-distributed
//! with the per-compartment scale derived by the model builder. Shape 2
//! gives the Rayleigh-type increasing hazard used by default.

use hf_model::TransitionModel;
use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, Weibull};

use crate::discrete::DiscreteChain;
use crate::error::{ChainError, ChainResult};

/// One stay in a compartment during a simulated path.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub compartment: usize,
    /// Entry time, in steps since the path started.
    pub entered_at: f64,
    /// Holding time in steps (truncated at the horizon for the last visit).
    pub sojourn: f64,
}

/// A semi-Markov chain: discrete jump structure plus Weibull holding times.
#[derive(Debug, Clone, PartialEq)]
pub struct SemiMarkovChain {
    chain: DiscreteChain,
    scales: DVector<f64>,
    shapes: DVector<f64>,
}

impl SemiMarkovChain {
    /// Validate scales and shapes against the jump chain.
    ///
    /// Both arrays must have one entry per compartment, all positive.
    pub fn new(
        chain: DiscreteChain,
        scales: DVector<f64>,
        shapes: DVector<f64>,
    ) -> ChainResult<Self> {
        check_positive("sojourn scale", &scales, chain.size())?;
        check_positive("sojourn shape", &shapes, chain.size())?;
        Ok(Self {
            chain,
            scales,
            shapes,
        })
    }

    /// Build with the uniform Rayleigh-type shape (2.0) per compartment.
    pub fn with_rayleigh_shape(chain: DiscreteChain, scales: DVector<f64>) -> ChainResult<Self> {
        let n = chain.size();
        Self::new(chain, scales, DVector::from_element(n, 2.0))
    }

    /// Wrap a built transition model with the default shape.
    pub fn from_model(model: &TransitionModel) -> ChainResult<Self> {
        let chain = DiscreteChain::from_model(model)?;
        Self::with_rayleigh_shape(chain, model.scales().clone())
    }

    pub fn size(&self) -> usize {
        self.chain.size()
    }

    pub fn jump_chain(&self) -> &DiscreteChain {
        &self.chain
    }

    pub fn scales(&self) -> &DVector<f64> {
        &self.scales
    }

    pub fn shapes(&self) -> &DVector<f64> {
        &self.shapes
    }

    /// Weibull hazard rate for compartment i at time-in-state t (steps).
    ///
    /// `h(t) = (k/λ) (t/λ)^(k-1)`; increasing in t for k > 1.
    pub fn hazard(&self, i: usize, t: f64) -> ChainResult<f64> {
        self.check_index(i)?;
        let scale = self.scales[i];
        let shape = self.shapes[i];
        Ok(shape / scale * (t / scale).powf(shape - 1.0))
    }

    /// Draw one Weibull-distributed holding time for compartment i.
    pub fn sample_sojourn<R: Rng + ?Sized>(&self, i: usize, rng: &mut R) -> ChainResult<f64> {
        self.check_index(i)?;
        // parameters already validated positive in new()
        let weibull = Weibull::new(self.scales[i], self.shapes[i]).expect("validated parameters");
        Ok(weibull.sample(rng))
    }

    /// Where compartment i's outflow goes, renormalized over the exits.
    ///
    /// `None` for an absorbing compartment (no positive off-diagonal).
    pub fn exit_distribution(&self, i: usize) -> ChainResult<Option<Vec<(usize, f64)>>> {
        self.check_index(i)?;
        let p = self.chain.matrix();
        let exits: Vec<(usize, f64)> = (0..self.size())
            .filter(|&j| j != i && p[(i, j)] > 0.0)
            .map(|j| (j, p[(i, j)]))
            .collect();
        let total: f64 = exits.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Ok(None);
        }
        Ok(Some(
            exits.into_iter().map(|(j, w)| (j, w / total)).collect(),
        ))
    }

    /// Simulate one path from `start` until the time horizon (in steps).
    ///
    /// Each visit holds for a Weibull-distributed sojourn, then jumps
    /// according to the exit distribution. The final visit is truncated at
    /// the horizon; an absorbing compartment holds until the horizon.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        start: usize,
        horizon: f64,
        rng: &mut R,
    ) -> ChainResult<Vec<Visit>> {
        self.check_index(start)?;
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(ChainError::InvalidDistribution {
                what: "horizon must be finite and positive",
            });
        }

        let mut path = Vec::new();
        let mut current = start;
        let mut t = 0.0;

        while t < horizon {
            let Some(exits) = self.exit_distribution(current)? else {
                path.push(Visit {
                    compartment: current,
                    entered_at: t,
                    sojourn: horizon - t,
                });
                break;
            };

            let sojourn = self.sample_sojourn(current, rng)?;
            if t + sojourn >= horizon {
                path.push(Visit {
                    compartment: current,
                    entered_at: t,
                    sojourn: horizon - t,
                });
                break;
            }

            path.push(Visit {
                compartment: current,
                entered_at: t,
                sojourn,
            });
            t += sojourn;
            current = pick_exit(&exits, rng);
        }

        Ok(path)
    }

    fn check_index(&self, i: usize) -> ChainResult<()> {
        if i >= self.size() {
            return Err(ChainError::IndexOutOfRange {
                index: i,
                size: self.size(),
            });
        }
        Ok(())
    }
}

fn check_positive(what: &'static str, values: &DVector<f64>, expected: usize) -> ChainResult<()> {
    if values.len() != expected {
        return Err(ChainError::DimensionMismatch {
            what,
            actual: values.len(),
            expected,
        });
    }
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChainError::NonPositiveParameter {
                what,
                index,
                value,
            });
        }
    }
    Ok(())
}

fn pick_exit<R: Rng + ?Sized>(exits: &[(usize, f64)], rng: &mut R) -> usize {
    let u: f64 = rng.r#gen();
    let mut acc = 0.0;
    for &(j, w) in exits {
        acc += w;
        if u < acc {
            return j;
        }
    }
    // floating-point slack on the last bucket
    exits.last().map(|&(j, _)| j).unwrap_or(0)
}
