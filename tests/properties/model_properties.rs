use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use irtsim::agents::ActionSpace;
use irtsim::concepts::{concept_index, concept_name};
use irtsim::generate::{
    DifficultyPolicy, LearnerProfileGenerator, LearnerStyle, QuestionGenerator, StylePolicy,
    VarkStyle,
};
use irtsim::irt::{p_correct, p_correct_multi};
use irtsim::student::Student;

proptest! {
    #[test]
    fn test_concept_name_round_trip(index in 0usize..=17_577) {
        let name = concept_name(index);
        prop_assert_eq!(concept_index(&name).unwrap(), index);
        prop_assert!(name.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_concept_names_grow_in_length(index in 0usize..20_000) {
        prop_assert!(concept_name(index).len() <= concept_name(index + 1).len());
    }

    #[test]
    fn test_irt_monotone_in_skill(
        s1 in -10.0f64..10.0,
        delta in 0.0f64..5.0,
        a in 0.1f64..3.0,
        b in -5.0f64..5.0,
        c in 0.0f64..0.5,
    ) {
        let s2 = s1 + delta;
        prop_assert!(p_correct(s1, a, b, c) <= p_correct(s2, a, b, c));
    }

    #[test]
    fn test_irt_decreasing_in_difficulty(
        skill in -10.0f64..10.0,
        b1 in -5.0f64..5.0,
        delta in 0.0f64..5.0,
        a in 0.1f64..3.0,
        c in 0.0f64..0.5,
    ) {
        let b2 = b1 + delta;
        prop_assert!(p_correct(skill, a, b2, c) <= p_correct(skill, a, b1, c));
    }

    #[test]
    fn test_irt_bounded_below_by_guessing(
        skill in -30.0f64..30.0,
        a in 0.1f64..3.0,
        b in -5.0f64..5.0,
        c in 0.0f64..0.5,
    ) {
        let p = p_correct(skill, a, b, c);
        prop_assert!(p >= c);
        prop_assert!(p <= 1.0);
    }

    #[test]
    fn test_multi_concept_uses_minimum(
        skills in prop::collection::vec(-5.0f64..5.0, 1..6),
        b in -3.0f64..3.0,
    ) {
        let min = skills.iter().copied().fold(f64::INFINITY, f64::min);
        let multi = p_correct_multi(&skills, b, 1.0, 0.25).unwrap();
        prop_assert_eq!(multi, p_correct(min, 1.0, b, 0.25));
    }

    #[test]
    fn test_sampled_styles_are_normalized(seed in any::<u64>(), mixture in any::<bool>()) {
        let policy = if mixture { StylePolicy::VarkMixture } else { StylePolicy::OneHot };
        let generator = LearnerProfileGenerator::new(policy, 0.0);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            let style = generator.sample_learning_style(&mut rng).unwrap();
            let weights = style.weights();
            prop_assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            prop_assert!(weights.iter().all(|w| *w >= 0.0));
            prop_assert!((1..=4).contains(&style.active_styles()));
        }
    }

    #[test]
    fn test_action_round_trip(n_concepts in 1usize..50, concept in 0usize..50, style in 0usize..4) {
        prop_assume!(concept < n_concepts);
        let space = ActionSpace::new(n_concepts);
        let action = space.encode(concept, style).unwrap();
        prop_assert_eq!(action, concept * 4 + style);
        let decoded = space.decode(action).unwrap();
        prop_assert_eq!((decoded.concept, decoded.style), (concept, style));
        prop_assert!(space.decode(space.len()).is_err());
    }

    #[test]
    fn test_questions_respect_bounds(
        seed in any::<u64>(),
        n_concepts in 1usize..12,
        max_frac in 0.0f64..1.0,
    ) {
        let max = 1 + ((n_concepts - 1) as f64 * max_frac) as usize;
        let generator = QuestionGenerator::new(n_concepts, max).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let policy = DifficultyPolicy::ConceptTable;
        let questions = generator.generate_with_policy(50, policy, &mut rng);
        for question in questions {
            let concepts = question.concepts();
            prop_assert!((1..=max).contains(&concepts.len()));
            prop_assert!(concepts.iter().all(|c| *c < n_concepts));
            let mut sorted = concepts.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), concepts.len());
            prop_assert!(question.difficulty().is_finite());
        }
    }

    #[test]
    fn test_teaching_only_touches_one_concept(
        skills in prop::collection::vec(-3.0f64..3.0, 1..8),
        concept_seed in any::<usize>(),
        style_idx in 0usize..4,
        delta in 0.0f64..1.0,
    ) {
        let concept = concept_seed % skills.len();
        let style = LearnerStyle::one_hot(VarkStyle::from_index(style_idx).unwrap());
        let mut student = Student::new(style, 0.0, skills.clone());
        student.observe_example(concept, style_idx, delta).unwrap();
        for (idx, (after, before)) in student.skills().iter().zip(&skills).enumerate() {
            if idx == concept {
                prop_assert_eq!(*after, before + delta);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}
