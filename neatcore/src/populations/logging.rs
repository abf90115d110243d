//! Generation-by-generation observation of an evolving population.

use crate::populations::Population;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Per-generation summary handed to `optimize` observers and recorded
/// by [`EvolutionLogger`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub population_size: usize,
    pub species_count: usize,
    pub champion_fitness: f64,
    pub champion_nodes: usize,
    pub champion_connections: usize,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gen {}: {} specimens in {} species, {:.2} best score with {} nodes {} connections",
            self.generation,
            self.population_size,
            self.species_count,
            self.champion_fitness,
            self.champion_nodes,
            self.champion_connections,
        )
    }
}

/// Defines how much genome data the logger clones per snapshot.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Keeps the champion genome's textual encoding.
    Champion,
    /// Keeps only the numeric summary.
    SummaryOnly,
}

/// A snapshot of a population at one generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Log {
    pub summary: GenerationSummary,
    /// Champion genome text, when the reporting level keeps it.
    pub champion: Option<String>,
}

/// A log of the evolution of a population over time.
///
/// # Examples
/// ```
/// use neatcore::genomics::GeneticConfig;
/// use neatcore::populations::{Population, PopulationConfig};
/// use neatcore::populations::logging::{EvolutionLogger, ReportingLevel};
/// use rand::{rngs::StdRng, SeedableRng};
/// use std::num::NonZeroUsize;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let mut population = Population::new(
///     GeneticConfig::new(
///         NonZeroUsize::new(1).unwrap(),
///         NonZeroUsize::new(1).unwrap(),
///     ),
///     PopulationConfig::new(NonZeroUsize::new(10).unwrap()),
///     &mut rng,
/// );
/// population.evaluate_fitness(|_| 1.0);
///
/// let mut logger = EvolutionLogger::new(ReportingLevel::Champion);
/// logger.log(&population);
///
/// for log in logger.iter() {
///     println!("{}", log.summary);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the given reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of the population.
    pub fn log(&mut self, population: &Population) {
        self.logs.push(Log {
            summary: population.summary(),
            champion: match self.reporting_level {
                ReportingLevel::Champion => {
                    population.champion().map(|brain| brain.genome().encode())
                }
                ReportingLevel::SummaryOnly => None,
            },
        })
    }

    /// Iterates over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }
}

/// Basic summary statistics over a data sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about the numbers in a sequence.
    ///
    /// # Examples
    /// ```
    /// use neatcore::populations::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Stats {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: 0.0,
                minimum: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f64;
        let mid = data.len() / 2;
        let mut median = *data
            .select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap())
            .1;
        if data.len() % 2 == 0 {
            median = (median
                + *data
                    .select_nth_unstable_by(mid - 1, |a, b| a.partial_cmp(b).unwrap())
                    .1)
                / 2.0;
        }
        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        }
    }
}
