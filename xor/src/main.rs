use neatcore::genomics::GeneticConfig;
use neatcore::networks::Brain;
use neatcore::populations::logging::Stats;
use neatcore::populations::{Population, PopulationConfig};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use std::num::NonZeroUsize;

const POPULATION_SIZE: usize = 50;
const GENERATIONS: usize = 500;

// Inputs are (bias, a, b).
const CASES: [([f64; 3], f64); 4] = [
    ([1.0, 0.0, 0.0], 0.0),
    ([1.0, 0.0, 1.0], 1.0),
    ([1.0, 1.0, 0.0], 1.0),
    ([1.0, 1.0, 1.0], 0.0),
];

fn evaluate_xor(brain: &mut Brain) -> f64 {
    let mut error = 0.0;
    for (inputs, expected) in &CASES {
        brain.reset_state();
        let output = brain.activate(inputs);
        error += (expected - output[0]).abs();
    }
    (4.0 - error).powi(2)
}

fn configs() -> (GeneticConfig, PopulationConfig) {
    (
        GeneticConfig::new(
            NonZeroUsize::new(3).unwrap(),
            NonZeroUsize::new(1).unwrap(),
        ),
        PopulationConfig::new(NonZeroUsize::new(POPULATION_SIZE).unwrap()),
    )
}

fn main() {
    if std::env::args().any(|arg| arg == "--stress") {
        stress_test();
    } else {
        demo();
    }
}

fn demo() {
    let (genetic_config, population_config) = configs();
    let mut rng = StdRng::from_entropy();

    println!(
        "Generating new population with {} specimens.",
        POPULATION_SIZE
    );
    let mut population = Population::new(genetic_config, population_config, &mut rng);
    println!("Starting optimization for {} steps.", GENERATIONS);
    population.optimize(evaluate_xor, GENERATIONS, &mut rng, |summary| {
        println!("{}", summary);
    });

    let champion = population
        .champion()
        .expect("evaluated population has a champion");
    println!("{}", champion.genome());

    let mut champion = champion.clone();
    for (inputs, expected) in &CASES {
        champion.reset_state();
        let output = champion.activate(inputs);
        println!("{:?} -> {:.4} (expected {})", inputs, output[0], expected);
    }
}

fn stress_test() {
    const ITERATIONS: usize = 100;

    let solved: Vec<Option<usize>> = (0..ITERATIONS)
        .into_par_iter()
        .map(|_| {
            let (genetic_config, population_config) = configs();
            let mut rng = StdRng::from_entropy();
            let mut population = Population::new(genetic_config, population_config, &mut rng);

            population.evaluate_fitness(evaluate_xor);
            for _ in 0..GENERATIONS {
                if population
                    .champion()
                    .map_or(false, |champion| champion.fitness() > 15.0)
                {
                    return Some(population.generation());
                }
                population.evolve(&mut rng);
                population.evaluate_fitness(evaluate_xor);
            }
            None
        })
        .collect();

    let generations = Stats::from(
        solved
            .iter()
            .filter_map(|generation| generation.map(|g| g as f64)),
    );
    let failures = solved
        .iter()
        .filter(|generation| generation.is_none())
        .count();
    println!(
        "Successful run generation count {:?}, {}% failure rate over {} iterations",
        generations,
        failures as f64 * 100.0 / ITERATIONS as f64,
        ITERATIONS
    );
}
