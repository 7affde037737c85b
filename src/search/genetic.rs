use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::model::weight::ScalarWeight;

use super::heap::Heap;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneticConfig {
    pub generations: usize,
    pub population_size: usize,
    pub mutation_probability: f64,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            population_size: 50,
            mutation_probability: 0.1,
            seed: 0,
        }
    }
}

pub trait Organism: Clone {
    /// A fresh random organism shaped like `self`.
    fn random_like<R: Rng + ?Sized>(&self, rng: &mut R) -> Self;
    fn cross_with<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self;
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R);
}

/// Elitist population: each generation keeps the best quarter, mutates it,
/// breeds it up to 80% of the population and fills the rest with newcomers.
pub struct GaPopulation {
    mutation_probability: f64,
    rng: StdRng,
}

impl GaPopulation {
    pub fn new(config: &GeneticConfig) -> Self {
        let mutation_probability = if config.mutation_probability.is_nan() {
            0.0
        } else {
            config.mutation_probability.clamp(0.0, 1.0)
        };
        Self {
            mutation_probability,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Evolves a population seeded from `template` and returns the `sample`
    /// fittest organisms, lowest fitness first.
    pub fn run<O, F>(
        &mut self,
        generations: usize,
        population_size: usize,
        sample: usize,
        template: &O,
        mut fitness: F,
    ) -> Vec<(O, ScalarWeight)>
    where
        O: Organism,
        F: FnMut(&O) -> ScalarWeight,
    {
        let mut organisms: Vec<O> = (0..population_size)
            .map(|_| template.random_like(&mut self.rng))
            .collect();

        for generation in 0..generations {
            let ranked = rank(organisms, &mut fitness);
            if let Some((_, best)) = ranked.first() {
                trace!(generation, best = %best, "ga generation ranked");
            }

            let survivors = (population_size / 4 + 1).min(ranked.len());
            let mut next: Vec<O> = ranked
                .into_iter()
                .take(survivors)
                .map(|(organism, _)| organism)
                .collect();
            for organism in next.iter_mut() {
                if self.rng.random_bool(self.mutation_probability) {
                    organism.mutate(&mut self.rng);
                }
            }

            let breeders = next.len();
            while breeders > 0 && next.len() < population_size * 4 / 5 {
                let mother = self.rng.random_range(0..breeders);
                let father = self.rng.random_range(0..breeders);
                let child = next[mother].cross_with(&next[father], &mut self.rng);
                next.push(child);
            }
            while next.len() < population_size {
                next.push(template.random_like(&mut self.rng));
            }
            organisms = next;
        }

        let mut ranked = rank(organisms, &mut fitness);
        ranked.truncate(sample);
        ranked
    }
}

fn rank<O, F>(organisms: Vec<O>, fitness: &mut F) -> Vec<(O, ScalarWeight)>
where
    F: FnMut(&O) -> ScalarWeight,
{
    let scored = organisms
        .into_iter()
        .map(|organism| {
            let score = fitness(&organism);
            (organism, score)
        })
        .collect();
    Heap::new(scored, |a: &(O, ScalarWeight), b: &(O, ScalarWeight)| b.1.compare(a.1))
        .into_sorted_vec()
}
