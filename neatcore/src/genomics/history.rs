use crate::genomics::GeneticConfig;
use crate::MutationId;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

/// A `History` keeps track of structural mutations in a population,
/// so that identical mutations are assigned the same mutation ids.
///
/// It owns the global next-mutation-id counter, monotone across the
/// whole evolutionary run, and a per-generation registry of the
/// structural changes performed this generation, keyed by the
/// `(from, to)` endpoints of the affected connection. Two lineages
/// that independently split the same connection, or add a connection
/// between the same two nodes, within one generation receive matching
/// ids, which keeps their genomes alignable in later generations.
///
/// The registry is population-wide and is cleared by
/// [`begin_generation`](History::begin_generation); the counter never
/// resets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct History {
    next_mutation_id: MutationId,
    splits: HashMap<(MutationId, MutationId), MutationId, RandomState>,
    additions: HashMap<(MutationId, MutationId), MutationId, RandomState>,
}

impl History {
    /// Creates a new history for the given lineage configuration.
    ///
    /// Minimal genomes allocate ids `0..inputs` to sensors,
    /// `inputs..inputs+outputs` to outputs, and one id per
    /// sensor-output connection after those, so the counter starts
    /// past the whole initial block.
    ///
    /// # Examples
    /// ```
    /// use neatcore::genomics::{GeneticConfig, History};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig::new(
    ///     NonZeroUsize::new(2).unwrap(),
    ///     NonZeroUsize::new(1).unwrap(),
    /// );
    /// let history = History::new(&config);
    ///
    /// assert_eq!(history.next_mutation_id(), 2 + 1 + 2);
    /// ```
    pub fn new(config: &GeneticConfig) -> History {
        let inputs = config.input_count.get();
        let outputs = config.output_count.get();
        History {
            next_mutation_id: inputs + outputs + inputs * outputs,
            splits: HashMap::default(),
            additions: HashMap::default(),
        }
    }

    /// Forgets this generation's structural mutations.
    /// The id counter is left untouched.
    pub fn begin_generation(&mut self) {
        self.splits.clear();
        self.additions.clear();
    }

    /// Returns the next unassigned mutation id.
    pub fn next_mutation_id(&self) -> MutationId {
        self.next_mutation_id
    }

    /// Returns the base id for a split of the connection `from -> to`:
    /// the new hidden node takes the base id, and the two replacement
    /// connections take the two ids after it.
    ///
    /// Reuses the id already assigned to the same split this
    /// generation, unless `duplicate` is set, in which case fresh ids
    /// are minted and recorded even for a registered split. Callers
    /// set `duplicate` when the registered ids already occur in the
    /// mutating genome, which would otherwise produce colliding genes.
    pub(crate) fn split_innovation(
        &mut self,
        from: MutationId,
        to: MutationId,
        duplicate: bool,
    ) -> MutationId {
        if !duplicate {
            if let Some(&base) = self.splits.get(&(from, to)) {
                return base;
            }
        }
        let base = self.next_mutation_id;
        self.next_mutation_id += 3;
        self.splits.insert((from, to), base);
        base
    }

    /// Returns the id for a new connection `from -> to`, reusing the
    /// id already assigned to the same addition this generation.
    pub(crate) fn connection_innovation(&mut self, from: MutationId, to: MutationId) -> MutationId {
        if let Some(&id) = self.additions.get(&(from, to)) {
            return id;
        }
        let id = self.next_mutation_id;
        self.next_mutation_id += 1;
        self.additions.insert((from, to), id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    fn history() -> History {
        History::new(&GeneticConfig::new(
            NonZeroUsize::new(2).unwrap(),
            NonZeroUsize::new(1).unwrap(),
        ))
    }

    #[test]
    fn split_ids_converge_within_a_generation() {
        let mut history = history();
        let first = history.split_innovation(0, 2, false);
        let second = history.split_innovation(0, 2, false);
        assert_eq!(first, second);
        assert_eq!(history.next_mutation_id(), first + 3);
    }

    #[test]
    fn duplicate_split_mints_fresh_ids() {
        let mut history = history();
        let first = history.split_innovation(0, 2, false);
        let second = history.split_innovation(0, 2, true);
        assert_eq!(second, first + 3);
    }

    #[test]
    fn addition_ids_converge_within_a_generation() {
        let mut history = history();
        let first = history.connection_innovation(2, 2);
        let second = history.connection_innovation(2, 2);
        assert_eq!(first, second);
        assert_eq!(history.next_mutation_id(), first + 1);
    }

    #[test]
    fn registry_resets_between_generations() {
        let mut history = history();
        let first = history.split_innovation(0, 2, false);
        history.begin_generation();
        let second = history.split_innovation(0, 2, false);
        assert_ne!(first, second);
        let third = history.connection_innovation(1, 2);
        assert_eq!(third, second + 3);
    }
}
