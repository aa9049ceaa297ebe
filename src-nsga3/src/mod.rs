//! NSGA-III many-objective optimizer in pure Rust using ndarray
//!
//! Reference-point based evolutionary search after Deb & Jain (2014),
//! tailored to box-constrained real genomes:
//!
//! - Box constraints (lower/upper bounds per coordinate)
//! - Structured Das–Dennis reference directions on the objective simplex
//! - Simulated binary crossover and polynomial mutation
//! - Exact duplicate elimination within a generation
//! - Fast non-dominated sorting plus reference-point niching with adaptive
//!   front normalization
//! - Fixed generation budget termination; the report carries the final first
//!   front
//!
//! Every objective is minimized. Callers with maximization axes negate them
//! in the fitness closure and restore the sign on emission.
//!
//! All random draws flow through a single seeded `StdRng` on the control
//! thread; fitness evaluation may fan out over rayon but collects in input
//! order, so a fixed seed reproduces the run bit for bit on any thread count.

use std::fmt;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

pub mod niching;
pub mod operators;
pub mod reference;
pub mod sorting;

pub use niching::{associate, niche_select, normalize, Association};
pub use operators::{polynomial_mutation, sbx_crossover};
pub use reference::{das_dennis, num_reference_directions};
pub use sorting::{dominates, fast_non_dominated_sort};

/// Errors surfaced before or during a run.
#[derive(Debug, Error)]
pub enum Nsga3Error {
    #[error("lower/upper bound vectors differ in length ({lower} vs {upper})")]
    BoundsMismatch { lower: usize, upper: usize },
    #[error("bound {index} is invalid: lower {lower}, upper {upper}")]
    InvalidBound { index: usize, lower: f64, upper: f64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("fitness returned {got} objectives, expected {expected}")]
    ObjectiveCountMismatch { expected: usize, got: usize },
}

/// Configuration for the NSGA-III optimizer.
#[derive(Debug, Clone)]
pub struct Nsga3Config {
    pub population_size: usize,
    /// Children per generation; `None` means `population_size / 2`.
    pub num_offsprings: Option<usize>,
    pub generations: usize,
    pub num_objectives: usize,
    /// Das–Dennis partitions per objective axis.
    pub num_partitions: usize,
    /// Per-pair SBX probability.
    pub crossover_prob: f64,
    /// SBX distribution index.
    pub crossover_eta: f64,
    /// Per-coordinate mutation probability; `None` means `1 / num_vars`.
    pub mutation_prob: Option<f64>,
    /// Polynomial mutation distribution index.
    pub mutation_eta: f64,
    pub seed: Option<u64>,
    /// Evaluate individuals across the rayon pool.
    pub parallel_eval: bool,
    /// Print per-generation progress to stderr.
    pub verbose: bool,
}

impl Default for Nsga3Config {
    fn default() -> Self {
        Self {
            population_size: 40,
            num_offsprings: None,
            generations: 50,
            num_objectives: 2,
            num_partitions: 12,
            crossover_prob: 0.9,
            crossover_eta: 15.0,
            mutation_prob: None,
            mutation_eta: 20.0,
            seed: None,
            parallel_eval: true,
            verbose: false,
        }
    }
}

/// Fluent builder for `Nsga3Config`.
pub struct Nsga3ConfigBuilder {
    cfg: Nsga3Config,
}

impl Nsga3ConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: Nsga3Config::default(),
        }
    }
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    pub fn num_offsprings(mut self, v: usize) -> Self {
        self.cfg.num_offsprings = Some(v);
        self
    }
    pub fn generations(mut self, v: usize) -> Self {
        self.cfg.generations = v;
        self
    }
    pub fn num_objectives(mut self, v: usize) -> Self {
        self.cfg.num_objectives = v;
        self
    }
    pub fn num_partitions(mut self, v: usize) -> Self {
        self.cfg.num_partitions = v;
        self
    }
    pub fn crossover(mut self, prob: f64, eta: f64) -> Self {
        self.cfg.crossover_prob = prob;
        self.cfg.crossover_eta = eta;
        self
    }
    pub fn mutation(mut self, prob: Option<f64>, eta: f64) -> Self {
        self.cfg.mutation_prob = prob;
        self.cfg.mutation_eta = eta;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    pub fn parallel_eval(mut self, v: bool) -> Self {
        self.cfg.parallel_eval = v;
        self
    }
    pub fn verbose(mut self, v: bool) -> Self {
        self.cfg.verbose = v;
        self
    }
    pub fn build(self) -> Nsga3Config {
        self.cfg
    }
}

impl Default for Nsga3ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an NSGA-III run.
#[derive(Clone)]
pub struct Nsga3Report {
    /// Genomes of the final first non-dominated front.
    pub front_x: Vec<Array1<f64>>,
    /// Their objective rows (minimized convention).
    pub front_f: Vec<Array1<f64>>,
    /// Generations executed.
    pub nit: usize,
    /// Fitness evaluations spent.
    pub nfev: usize,
    /// Final population genomes, one row per individual.
    pub population: Array2<f64>,
    /// Final population objectives, one row per individual.
    pub population_objectives: Array2<f64>,
}

impl fmt::Debug for Nsga3Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nsga3Report")
            .field("front", &format!("{} members", self.front_x.len()))
            .field("nit", &self.nit)
            .field("nfev", &self.nfev)
            .field(
                "population",
                &format!("{}x{}", self.population.nrows(), self.population.ncols()),
            )
            .finish()
    }
}

/// NSGA-III optimizer over a box-constrained real genome.
pub struct Nsga3<'a, F>
where
    F: Fn(&Array1<f64>) -> Array1<f64> + Sync,
{
    func: &'a F,
    lower: Array1<f64>,
    upper: Array1<f64>,
    config: Nsga3Config,
}

impl<'a, F> Nsga3<'a, F>
where
    F: Fn(&Array1<f64>) -> Array1<f64> + Sync,
{
    /// Create an optimizer with fitness `func` and bounds `[lower, upper]`.
    pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>) -> Self {
        Self {
            func,
            lower,
            upper,
            config: Nsga3Config::default(),
        }
    }

    /// Mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Nsga3Config {
        &mut self.config
    }

    fn validate(&self) -> Result<(), Nsga3Error> {
        if self.lower.len() != self.upper.len() {
            return Err(Nsga3Error::BoundsMismatch {
                lower: self.lower.len(),
                upper: self.upper.len(),
            });
        }
        if self.lower.is_empty() {
            return Err(Nsga3Error::InvalidConfig("empty bounds".into()));
        }
        for i in 0..self.lower.len() {
            let (lo, hi) = (self.lower[i], self.upper[i]);
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(Nsga3Error::InvalidBound {
                    index: i,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        let c = &self.config;
        if c.population_size < 4 {
            return Err(Nsga3Error::InvalidConfig(format!(
                "population_size {} below minimum of 4",
                c.population_size
            )));
        }
        if c.generations == 0 {
            return Err(Nsga3Error::InvalidConfig("generations must be at least 1".into()));
        }
        if c.num_objectives < 2 {
            return Err(Nsga3Error::InvalidConfig("need at least two objectives".into()));
        }
        if c.num_partitions == 0 {
            return Err(Nsga3Error::InvalidConfig("num_partitions must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&c.crossover_prob) {
            return Err(Nsga3Error::InvalidConfig("crossover_prob outside [0, 1]".into()));
        }
        if let Some(p) = c.mutation_prob {
            if !(0.0..=1.0).contains(&p) {
                return Err(Nsga3Error::InvalidConfig("mutation_prob outside [0, 1]".into()));
            }
        }
        Ok(())
    }

    /// Run the optimization.
    pub fn solve(&mut self) -> Result<Nsga3Report, Nsga3Error> {
        self.validate()?;
        let n = self.lower.len();
        let m = self.config.num_objectives;
        let npop = self.config.population_size;
        let n_off = self.config.num_offsprings.unwrap_or(npop / 2).max(2);
        let mutation_prob = self.config.mutation_prob.unwrap_or(1.0 / n as f64);
        let ref_dirs = das_dennis(m, self.config.num_partitions);

        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        if self.config.verbose {
            eprintln!(
                "NSGA3 init: {} vars, {} objectives, population={}, offsprings={}, {} reference directions, generations={}",
                n,
                m,
                npop,
                n_off,
                ref_dirs.nrows(),
                self.config.generations
            );
        }

        let mut pop = init_random(n, npop, &self.lower, &self.upper, &mut rng);
        let mut objs = self.evaluate(&pop)?;
        let mut nfev = pop.len();

        let mut nit = 0;
        for generation in 1..=self.config.generations {
            nit = generation;

            let mut children = Vec::with_capacity(n_off);
            while children.len() < n_off {
                let i = rng.random_range(0..pop.len());
                let mut j = rng.random_range(0..pop.len());
                while pop.len() > 1 && j == i {
                    j = rng.random_range(0..pop.len());
                }
                let (mut c1, mut c2) = sbx_crossover(
                    &pop[i],
                    &pop[j],
                    &self.lower,
                    &self.upper,
                    self.config.crossover_prob,
                    self.config.crossover_eta,
                    &mut rng,
                );
                polynomial_mutation(
                    &mut c1,
                    &self.lower,
                    &self.upper,
                    mutation_prob,
                    self.config.mutation_eta,
                    &mut rng,
                );
                polynomial_mutation(
                    &mut c2,
                    &self.lower,
                    &self.upper,
                    mutation_prob,
                    self.config.mutation_eta,
                    &mut rng,
                );
                children.push(c1);
                if children.len() < n_off {
                    children.push(c2);
                }
            }

            // Exact duplicates add nothing to the front and would crowd a
            // niche; drop them against parents and earlier siblings.
            let mut unique: Vec<Array1<f64>> = Vec::with_capacity(children.len());
            for child in children {
                if pop.iter().chain(unique.iter()).any(|x| *x == child) {
                    continue;
                }
                unique.push(child);
            }
            if unique.is_empty() {
                continue;
            }

            let child_objs = self.evaluate(&unique)?;
            nfev += unique.len();

            pop.extend(unique);
            objs.extend(child_objs);
            let survivors = select_survivors(&objs, npop, &ref_dirs);
            pop = survivors.iter().map(|&i| pop[i].clone()).collect();
            objs = survivors.iter().map(|&i| objs[i].clone()).collect();

            if self.config.verbose {
                let front1 = fast_non_dominated_sort(&objs)[0].len();
                eprintln!(
                    "NSGA3 gen {:4}  pop={}  front1={}  nfev={}",
                    generation,
                    pop.len(),
                    front1,
                    nfev
                );
            }
        }

        let fronts = fast_non_dominated_sort(&objs);
        let front_x: Vec<Array1<f64>> = fronts[0].iter().map(|&i| pop[i].clone()).collect();
        let front_f: Vec<Array1<f64>> = fronts[0].iter().map(|&i| objs[i].clone()).collect();

        if self.config.verbose {
            eprintln!(
                "NSGA3 done: {} generations, {} evaluations, first front holds {} scenarios",
                nit,
                nfev,
                front_x.len()
            );
        }

        Ok(Nsga3Report {
            front_x,
            front_f,
            nit,
            nfev,
            population: stack_rows(&pop, n),
            population_objectives: stack_rows(&objs, m),
        })
    }

    fn evaluate(&self, xs: &[Array1<f64>]) -> Result<Vec<Array1<f64>>, Nsga3Error> {
        let objs: Vec<Array1<f64>> = if self.config.parallel_eval {
            xs.par_iter().map(|x| (self.func)(x)).collect()
        } else {
            xs.iter().map(|x| (self.func)(x)).collect()
        };
        for f in &objs {
            if f.len() != self.config.num_objectives {
                return Err(Nsga3Error::ObjectiveCountMismatch {
                    expected: self.config.num_objectives,
                    got: f.len(),
                });
            }
        }
        Ok(objs)
    }
}

/// Environmental selection: fill front by front, niche the overflow front.
fn select_survivors(objs: &[Array1<f64>], npop: usize, ref_dirs: &Array2<f64>) -> Vec<usize> {
    let fronts = fast_non_dominated_sort(objs);
    let mut selected: Vec<usize> = Vec::with_capacity(npop);
    for front in &fronts {
        if selected.len() + front.len() <= npop {
            selected.extend(front.iter().copied());
            if selected.len() == npop {
                break;
            }
            continue;
        }
        let k = npop - selected.len();
        // Considered set: what survived so far plus the overflow front, in
        // that order so local indices of survivors come first.
        let considered: Vec<usize> = selected.iter().chain(front.iter()).copied().collect();
        let points: Vec<Array1<f64>> = considered.iter().map(|&i| objs[i].clone()).collect();
        let normalized = normalize(&points);
        let associations = associate(&normalized, ref_dirs);
        let local_selected: Vec<usize> = (0..selected.len()).collect();
        let local_candidates: Vec<usize> = (selected.len()..considered.len()).collect();
        let chosen = niche_select(
            &local_candidates,
            &associations,
            &local_selected,
            ref_dirs.nrows(),
            k,
        );
        selected.extend(chosen.into_iter().map(|local| considered[local]));
        break;
    }
    selected
}

// ------------------------------ Utilities ------------------------------

fn init_random<R: Rng + ?Sized>(
    n: usize,
    npop: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Vec<Array1<f64>> {
    (0..npop)
        .map(|_| {
            Array1::from_shape_fn(n, |j| {
                let u: f64 = rng.random();
                lower[j] + u * (upper[j] - lower[j])
            })
        })
        .collect()
}

fn stack_rows(rows: &[Array1<f64>], ncols: usize) -> Array2<f64> {
    let mut out = Array2::zeros((rows.len(), ncols));
    for (i, row) in rows.iter().enumerate() {
        out.row_mut(i).assign(row);
    }
    out
}

/// Convenience function over `(lower, upper)` tuple bounds.
pub fn nsga3<F>(
    func: &F,
    bounds: &[(f64, f64)],
    config: Nsga3Config,
) -> Result<Nsga3Report, Nsga3Error>
where
    F: Fn(&Array1<f64>) -> Array1<f64> + Sync,
{
    let n = bounds.len();
    let mut lower = Array1::<f64>::zeros(n);
    let mut upper = Array1::<f64>::zeros(n);
    for (i, (lo, hi)) in bounds.iter().enumerate() {
        lower[i] = *lo;
        upper[i] = *hi;
    }
    let mut solver = Nsga3::new(func, lower, upper);
    *solver.config_mut() = config;
    solver.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, array};

    fn two_hump(x: &Array1<f64>) -> Array1<f64> {
        // minima at 0 and 1; the front is the segment in between
        let v = x[0];
        array![v * v, (v - 1.0) * (v - 1.0)]
    }

    #[test]
    fn front_members_are_mutually_non_dominated() {
        let cfg = Nsga3ConfigBuilder::new()
            .seed(7)
            .population_size(24)
            .generations(20)
            .num_objectives(2)
            .num_partitions(10)
            .parallel_eval(false)
            .build();
        let report = nsga3(&two_hump, &[(-2.0, 3.0)], cfg).unwrap();
        assert!(!report.front_x.is_empty());
        for a in &report.front_f {
            for b in &report.front_f {
                assert!(!dominates(a, b));
            }
        }
    }

    #[test]
    fn genomes_stay_inside_bounds() {
        let cfg = Nsga3ConfigBuilder::new()
            .seed(11)
            .population_size(16)
            .generations(10)
            .num_objectives(2)
            .num_partitions(6)
            .build();
        let report = nsga3(&two_hump, &[(-2.0, 3.0)], cfg).unwrap();
        for x in report.population.rows() {
            assert!(x[0] >= -2.0 && x[0] <= 3.0);
        }
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let cfg = || {
            Nsga3ConfigBuilder::new()
                .seed(99)
                .population_size(20)
                .generations(15)
                .num_objectives(2)
                .num_partitions(8)
                .build()
        };
        let a = nsga3(&two_hump, &[(0.0, 1.0)], cfg()).unwrap();
        let b = nsga3(&two_hump, &[(0.0, 1.0)], cfg()).unwrap();
        assert_eq!(a.front_x, b.front_x);
        assert_eq!(a.front_f, b.front_f);
        assert_eq!(a.nfev, b.nfev);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let cfg = Nsga3Config::default();
        let err = nsga3(&two_hump, &[(1.0, 0.0)], cfg).unwrap_err();
        assert!(matches!(err, Nsga3Error::InvalidBound { index: 0, .. }));
    }

    #[test]
    fn rejects_wrong_objective_count() {
        let bad = |_: &Array1<f64>| arr1(&[1.0, 2.0, 3.0]);
        let cfg = Nsga3ConfigBuilder::new().seed(1).num_objectives(2).build();
        let err = nsga3(&bad, &[(0.0, 1.0)], cfg).unwrap_err();
        assert!(matches!(
            err,
            Nsga3Error::ObjectiveCountMismatch { expected: 2, got: 3 }
        ));
    }
}
