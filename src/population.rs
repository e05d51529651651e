use rand::seq::index;
use rand::Rng;

#[cfg(feature = "parallel")]
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rand_pcg::Pcg32;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{EvolveError, Result};
use crate::fitness::Target;
use crate::individual::Individual;
use crate::stats::GenerationStats;

/// fixed-size set of individuals, always sorted by fitness (best first)
#[derive(Clone, Debug)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// `population_size` all-transparent random individuals, sorted
    pub fn initial<R: Rng + ?Sized>(
        rng: &mut R,
        population_size: usize,
        individual_size: usize,
        target: &Target,
    ) -> Result<Self> {
        profiling::scope!("Population::initial");
        let individuals = (0..population_size)
            .map(|_| Individual::random(rng, individual_size, target))
            .collect();
        Self::from_individuals(individuals)
    }

    pub fn from_individuals(individuals: Vec<Individual>) -> Result<Self> {
        if individuals.is_empty() {
            return Err(EvolveError::InvalidSettings(
                "population needs at least one individual".to_string(),
            ));
        }
        let mut population = Self { individuals };
        population.sort();
        Ok(population)
    }

    // stable, so individuals with equal fitness keep their slot order
    fn sort(&mut self) {
        profiling::scope!("Population::sort");
        self.individuals.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    #[inline]
    pub fn best(&self) -> &Individual {
        &self.individuals[0]
    }

    #[inline]
    pub fn worst(&self) -> &Individual {
        &self.individuals[self.individuals.len() - 1]
    }

    #[inline]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// current scores in rank order
    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals.iter().map(Individual::fitness).collect()
    }

    pub fn stats(&self, generation: u64) -> GenerationStats {
        GenerationStats::from_values(generation, &self.fitness_values())
    }

    /// one generational step.
    ///
    /// slots `[0, elite_count)` are left untouched. every other slot is overwritten
    /// by a child of two distinct elites drawn uniformly without replacement (the
    /// same pair may parent several children). the population is then re-sorted.
    /// since the elites survive as-is, the best fitness never decreases.
    pub fn select_parents_and_replace<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        elite_count: usize,
        mutation_rate: f64,
        target: &Target,
    ) -> Result<()> {
        profiling::scope!("select_parents_and_replace");
        if elite_count < 2 || elite_count > self.individuals.len() {
            return Err(EvolveError::InvalidSettings(format!(
                "elite_count must be within [2, {}], got {}",
                self.individuals.len(),
                elite_count
            )));
        }
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(EvolveError::InvalidSettings(format!(
                "mutation_rate must be within [0, 1], got {}",
                mutation_rate
            )));
        }

        self.replace_offspring(rng, elite_count, mutation_rate, target);
        self.sort();
        Ok(())
    }

    // per slot: parent sampling, then child construction, both on the shared rng
    #[cfg(not(feature = "parallel"))]
    fn replace_offspring<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        elite_count: usize,
        mutation_rate: f64,
        target: &Target,
    ) {
        for slot in elite_count..self.individuals.len() {
            let parents = index::sample(rng, elite_count, 2);
            let child = Individual::from_parents(
                rng,
                &self.individuals[parents.index(0)],
                &self.individuals[parents.index(1)],
                mutation_rate,
                target,
            );
            self.individuals[slot] = child;
        }
    }

    // parents and one seed per slot are drawn sequentially in slot order, then each
    // child is built on its own rng. results come back in slot order.
    #[cfg(feature = "parallel")]
    fn replace_offspring<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        elite_count: usize,
        mutation_rate: f64,
        target: &Target,
    ) {
        let jobs: Vec<(usize, usize, u64)> = (elite_count..self.individuals.len())
            .map(|_| {
                let parents = index::sample(rng, elite_count, 2);
                (parents.index(0), parents.index(1), rng.random::<u64>())
            })
            .collect();

        let elites = &self.individuals[..elite_count];
        let children: Vec<Individual> = jobs
            .into_par_iter()
            .map(|(a, b, seed)| {
                let mut child_rng = Pcg32::seed_from_u64(seed);
                Individual::from_parents(&mut child_rng, &elites[a], &elites[b], mutation_rate, target)
            })
            .collect();

        for (slot, child) in self.individuals[elite_count..].iter_mut().zip(children) {
            *slot = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::Gene;
    use crate::settings::Settings;
    use image::{Rgb, RgbImage};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn target() -> Target {
        Target::from_image(RgbImage::from_pixel(12, 12, Rgb([220, 180, 40])), &Settings::default())
            .unwrap()
    }

    fn assert_sorted(pop: &Population) {
        let values = pop.fitness_values();
        assert!(values.windows(2).all(|w| w[0] >= w[1]), "not sorted: {values:?}");
    }

    #[test]
    fn test_initial_population_shape() {
        let target = target();
        let pop = Population::initial(&mut Pcg32::seed_from_u64(1), 12, 8, &target).unwrap();
        assert_eq!(pop.len(), 12);
        assert!(pop.individuals().iter().all(|ind| ind.len() == 8));
        assert_sorted(&pop);
        // all transparent: everyone ties at the blank fitness
        assert_eq!(pop.best().fitness(), pop.worst().fitness());
    }

    #[test]
    fn test_empty_population_rejected() {
        let target = target();
        let result = Population::initial(&mut Pcg32::seed_from_u64(1), 0, 8, &target);
        assert!(matches!(result, Err(EvolveError::InvalidSettings(_))));
    }

    #[test]
    fn test_from_individuals_sorts_descending() {
        let target = target();
        let mut rng = Pcg32::seed_from_u64(9);
        let individuals = (0..10)
            .map(|_| {
                let genes = (0..6).map(|_| Gene::random(&mut rng, target.canvas(), true)).collect();
                Individual::from_genes(genes, &target)
            })
            .collect();
        let pop = Population::from_individuals(individuals).unwrap();
        assert_sorted(&pop);
        let values = pop.fitness_values();
        assert_eq!(pop.best().fitness(), values[0]);
        assert_eq!(pop.worst().fitness(), values[values.len() - 1]);
    }

    #[test]
    fn test_step_keeps_size_order_and_best() {
        let target = target();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pop = Population::initial(&mut rng, 15, 10, &target).unwrap();
        for _ in 0..20 {
            let before = pop.best().fitness();
            pop.select_parents_and_replace(&mut rng, 4, 0.2, &target).unwrap();
            assert_eq!(pop.fitness_values().len(), 15);
            assert_sorted(&pop);
            assert!(pop.best().fitness() >= before);
        }
    }

    #[test]
    fn test_elite_fitness_survives_the_step() {
        let target = target();
        let mut rng = Pcg32::seed_from_u64(31);
        let mut pop = Population::initial(&mut rng, 10, 6, &target).unwrap();
        for _ in 0..5 {
            pop.select_parents_and_replace(&mut rng, 3, 0.3, &target).unwrap();
        }
        let elites: Vec<Vec<Gene>> = pop.individuals()[..3].iter().map(|i| i.genes().to_vec()).collect();
        pop.select_parents_and_replace(&mut rng, 3, 0.3, &target).unwrap();
        for genes in &elites {
            assert!(
                pop.individuals().iter().any(|ind| ind.genes() == genes.as_slice()),
                "an elite was dropped"
            );
        }
    }

    #[test]
    fn test_whole_population_elite_is_a_no_op() {
        let target = target();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pop = Population::initial(&mut rng, 6, 4, &target).unwrap();
        let before = pop.fitness_values();
        pop.select_parents_and_replace(&mut rng, 6, 0.5, &target).unwrap();
        assert_eq!(pop.fitness_values(), before);
    }

    #[test]
    fn test_bad_elite_count_rejected() {
        let target = target();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pop = Population::initial(&mut rng, 6, 4, &target).unwrap();
        assert!(pop.select_parents_and_replace(&mut rng, 1, 0.1, &target).is_err());
        assert!(pop.select_parents_and_replace(&mut rng, 7, 0.1, &target).is_err());
    }

    #[test]
    fn test_bad_mutation_rate_rejected() {
        let target = target();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pop = Population::initial(&mut rng, 6, 4, &target).unwrap();
        let before = pop.fitness_values();
        for rate in [1.5, -0.1, f64::NAN] {
            let result = pop.select_parents_and_replace(&mut rng, 2, rate, &target);
            assert!(matches!(result, Err(EvolveError::InvalidSettings(_))), "rate {rate} accepted");
        }
        // rejected before any slot is touched
        assert_eq!(pop.fitness_values(), before);
        // both bounds are valid
        assert!(pop.select_parents_and_replace(&mut rng, 2, 0.0, &target).is_ok());
        assert!(pop.select_parents_and_replace(&mut rng, 2, 1.0, &target).is_ok());
    }

    #[test]
    fn test_seeded_steps_are_reproducible() {
        let target = target();
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pop = Population::initial(&mut rng, 8, 5, &target).unwrap();
            for _ in 0..4 {
                pop.select_parents_and_replace(&mut rng, 3, 0.25, &target).unwrap();
            }
            pop.fitness_values()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_stats_reflect_population() {
        let target = target();
        let pop = Population::initial(&mut Pcg32::seed_from_u64(1), 5, 3, &target).unwrap();
        let stats = pop.stats(1);
        assert_eq!(stats.best, pop.best().fitness());
        assert_eq!(stats.worst, pop.worst().fitness());
        assert!(stats.std_dev.abs() < 1e-12);
    }
}
