//! E2E Scenario: student responses and teaching examples.

use irtsim::generate::{DifficultyPolicy, LearnerStyle, Question, QuestionGenerator, VarkStyle};
use irtsim::irt::{IrtParams, p_correct};
use irtsim::student::Student;

use super::common::seeded;

#[test]
fn empirical_correct_rate_matches_irt_probability() {
    let mut rng = seeded(9);
    let generator = QuestionGenerator::new(5, 1).unwrap();
    let questions = generator.generate_with_policy(1, DifficultyPolicy::StandardNormal, &mut rng);
    let question = &questions[0];
    assert_eq!(question.concepts().len(), 1);

    let student = Student::new(
        LearnerStyle::one_hot(VarkStyle::Visual),
        0.0,
        vec![0.0; 5],
    );
    let irt = IrtParams::default();
    let expected = p_correct(0.0, 1.0, question.difficulty(), 0.25);

    let trials = 10_000;
    let mut correct = 0;
    for _ in 0..trials {
        let answer = student.answer_question(question, &irt, &mut rng).unwrap();
        assert!((answer.p_correct - expected).abs() < 1e-15);
        if answer.is_correct {
            correct += 1;
        }
    }
    let rate = f64::from(correct) / f64::from(trials);
    assert!(
        (rate - expected).abs() < 0.03,
        "empirical {rate} vs analytic {expected}"
    );
    assert_eq!(student.skills(), &[0.0; 5]);
}

#[test]
fn matching_style_example_adds_exactly_delta() {
    let mut student = Student::new(
        LearnerStyle::from_weights([0.0, 1.0, 0.0, 0.0]).unwrap(),
        0.0,
        vec![0.4, -0.3, 1.1, 0.0, 2.5],
    );
    let before = student.skills().to_vec();
    student.observe_example(2, 1, 0.2).unwrap();
    assert_eq!(student.skills()[2], before[2] + 0.2);
    for idx in [0, 1, 3, 4] {
        assert_eq!(student.skills()[idx], before[idx]);
    }
}

#[test]
fn skill_gain_raises_answer_probability() {
    let mut student = Student::new(LearnerStyle::one_hot(VarkStyle::Kinesthetic), 0.0, vec![-2.0]);
    let irt = IrtParams::default();
    let question = Question::new(vec![0], 0.0).unwrap();
    let mut last = student.p_correct(&question, &irt).unwrap();
    for _ in 0..10 {
        student.observe_example(0, VarkStyle::Kinesthetic.index(), 0.2).unwrap();
        let now = student.p_correct(&question, &irt).unwrap();
        assert!(now > last);
        last = now;
    }
}
