//! E2E Scenario: bandit warm-up and convergence.

use irtsim::agents::{BanditConfig, EpsilonSchedule, MultiArmBandit, StepSize};
use irtsim::generate::{LearnerStyle, VarkStyle};
use rand::Rng;

use super::common::{mid_episode, seeded};

/// Chi-square critical value for one degree of freedom at p = 0.001.
const CHI_SQUARE_DF1_P001: f64 = 10.83;

#[test]
fn warmup_is_uniform_regardless_of_estimates() {
    let style = LearnerStyle::one_hot(VarkStyle::Visual);
    let context = mid_episode(&[], &style);
    let mut rng = seeded(3);
    let mut counts = [0_u64; 2];

    // 2 actions x multiplier 5 = warm-up threshold of 10 steps
    let draws = 2_000;
    for _ in 0..draws {
        let mut bandit = MultiArmBandit::epsilon_greedy(2, BanditConfig::default())
            .unwrap()
            .with_value_estimates(vec![100.0, 0.0])
            .unwrap();
        assert_eq!(bandit.warmup_steps(), 10);
        while bandit.in_warmup() {
            let action = bandit.select_action(100.0, &context, &mut rng).unwrap();
            counts[action] += 1;
        }
    }

    let total = (counts[0] + counts[1]) as f64;
    let expected = total / 2.0;
    let chi_square: f64 = counts
        .iter()
        .map(|&observed| (observed as f64 - expected).powi(2) / expected)
        .sum();
    assert!(
        chi_square < CHI_SQUARE_DF1_P001,
        "warm-up counts {counts:?} give chi-square {chi_square}"
    );
}

#[test]
fn epsilon_greedy_settles_on_the_best_action() {
    let arms = [0.2, 0.8, 0.5];
    let epsilon = 0.1;
    let config = BanditConfig {
        epsilon: EpsilonSchedule::Constant { epsilon },
        warmup_multiplier: 5,
        step_size: StepSize::SampleAverage,
    };
    let style = LearnerStyle::one_hot(VarkStyle::Visual);
    let context = mid_episode(&[], &style);

    let trials = 20;
    let horizon = 4_000;
    let tail = 1_000;
    let mut best_share = 0.0;
    for trial in 0..trials {
        let mut rng = seeded(100 + trial);
        let mut bandit = MultiArmBandit::epsilon_greedy(arms.len(), config).unwrap();
        let mut reward = 0.0;
        let mut best_picks = 0;
        for step in 0..horizon {
            let action = bandit.select_action(reward, &context, &mut rng).unwrap();
            reward = if rng.random::<f64>() < arms[action] { 1.0 } else { 0.0 };
            if step >= horizon - tail && action == 1 {
                best_picks += 1;
            }
        }
        best_share += f64::from(best_picks) / f64::from(tail);
    }
    best_share /= f64::from(trials as u32);

    // greedy picks plus the uniform share of exploration
    let target = 1.0 - epsilon + epsilon / arms.len() as f64;
    assert!(
        (best_share - target).abs() < 0.04,
        "best action share {best_share}, expected about {target}"
    );
}

#[test]
fn proportional_exploration_favours_higher_estimates() {
    let config = BanditConfig {
        epsilon: EpsilonSchedule::Constant { epsilon: 1.0 },
        warmup_multiplier: 0,
        step_size: StepSize::GlobalStep,
    };
    let style = LearnerStyle::one_hot(VarkStyle::Aural);
    let context = mid_episode(&[], &style);
    let mut rng = seeded(17);
    let mut counts = [0_u32; 2];
    for _ in 0..4_000 {
        let mut bandit = MultiArmBandit::sample_proportional(2, config)
            .unwrap()
            .with_value_estimates(vec![0.25, 0.75])
            .unwrap();
        // crediting action 0 with its own estimate leaves both estimates as set
        let action = bandit.select_action(0.25, &context, &mut rng).unwrap();
        counts[action] += 1;
    }
    let share = f64::from(counts[1]) / 4_000.0;
    assert!((share - 0.75).abs() < 0.03, "share of action 1: {share}");
}
