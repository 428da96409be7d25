use crate::sim::config::SimConfig;
use anyhow::{Context, Result};
use rand::{
    Rng, SeedableRng,
    distributions::{Distribution, WeightedIndex},
    rngs::StdRng,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Build { owner: String, length: usize },
    Release { owner: String },
    Idle,
}

/// Random request stream drawn from a `SimConfig`.
pub struct Workload {
    rng: StdRng,
    owners: Vec<String>,
    min_len: usize,
    max_len: usize,
    // build, release, idle
    choice: WeightedIndex<f64>,
}

impl Workload {
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let w = &config.weights;
        let choice = WeightedIndex::new([w.build, w.release, w.idle])
            .context("building action weights")?;
        Ok(Workload {
            rng,
            owners: config.owners.clone(),
            min_len: config.size_range.min,
            max_len: config.size_range.max,
            choice,
        })
    }

    pub fn next_action(&mut self) -> Action {
        match self.choice.sample(&mut self.rng) {
            0 => Action::Build {
                owner: self.pick_owner(),
                length: self.rng.gen_range(self.min_len..=self.max_len),
            },
            1 => Action::Release {
                owner: self.pick_owner(),
            },
            _ => Action::Idle,
        }
    }

    fn pick_owner(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.owners.len());
        self.owners[idx].clone()
    }
}
