use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use irtsim::agents::{Agent, AgentKind, BanditConfig};
use irtsim::config::SimulationConfig;
use irtsim::env::{EnvOptions, Population, StudentEnv, run_simulation};
use irtsim::generate::{LearnerProfileGenerator, StylePolicy};

fn population(seed: u64, policy: StylePolicy) -> Population {
    let simulation = SimulationConfig {
        n_students: 3,
        n_concepts: 4,
        n_questions: 15,
        max_concepts_per_question: 2,
        seed,
        ..SimulationConfig::default()
    };
    let profile = LearnerProfileGenerator::new(policy, -1.0);
    Population::generate(&simulation, &profile, &mut StdRng::seed_from_u64(seed)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_population_deterministic(seed in any::<u64>()) {
        let first = population(seed, StylePolicy::VarkMixture);
        let second = population(seed, StylePolicy::VarkMixture);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_run_deterministic(seed in any::<u64>(), kind_idx in 0usize..4) {
        let kind = AgentKind::all()[kind_idx];
        let run = || {
            let population = population(seed, StylePolicy::OneHot);
            let mut env = StudentEnv::new(population, EnvOptions::default()).unwrap();
            let mut agent = Agent::new(kind, env.action_space(), BanditConfig::default()).unwrap();
            let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
            run_simulation(&mut env, &mut agent, true, &mut rng).unwrap()
        };
        prop_assert_eq!(run(), run());
    }
}
