//! Property tests for the action encoding, student model and belief tracker

use std::sync::Arc;

use proptest::prelude::*;

use fraction_tutor::bank::{generate_bank, QuestionBank};
use fraction_tutor::core::{Action, Cell, Difficulty, EnvConfig, Format, TutorError};
use fraction_tutor::env::{update_belief, TutorEnv};
use fraction_tutor::student::{p_correct_mean, step_engagement, StudentParams};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    (1u8..=5).prop_map(|d| Difficulty::new(d).unwrap())
}

fn format() -> impl Strategy<Value = Format> {
    prop::sample::select(Format::ALL.to_vec())
}

/// Test 1: Every action decodes to a distinct cell and encodes back
#[test]
fn test_action_cell_bijection() {
    let cells: Vec<Cell> = Action::all().map(|a| a.cell()).collect();
    for (i, cell) in cells.iter().enumerate() {
        assert_eq!(Action::from_cell(*cell).index(), i);
        assert_eq!(cells.iter().filter(|c| *c == cell).count(), 1);
    }
    assert_eq!(cells.len(), Cell::all().count());
}

proptest! {
    /// Test 2: Out-of-range action indices are rejected
    #[test]
    fn prop_out_of_range_action_rejected(i in Action::COUNT..10_000usize) {
        prop_assert!(matches!(Action::new(i), Err(TutorError::InvalidAction(j)) if j == i));
    }

    /// Test 3: Harder items are never easier to answer
    #[test]
    fn prop_p_correct_non_increasing_in_difficulty(
        theta in -2.0..2.0f64,
        rs in 0.0..2.0f64,
        eng in 0.0..=1.0f64,
        fmt in format(),
        d1 in 1u8..=5,
        d2 in 1u8..=5,
    ) {
        let (lo, hi) = (d1.min(d2), d1.max(d2));
        let params = StudentParams::new(theta, rs);
        let easy = p_correct_mean(&params, Difficulty::new(lo).unwrap(), fmt, eng);
        let hard = p_correct_mean(&params, Difficulty::new(hi).unwrap(), fmt, eng);
        prop_assert!(hard <= easy);
    }

    /// Test 4: More reading sensitivity never helps
    #[test]
    fn prop_p_correct_non_increasing_in_reading_sensitivity(
        theta in -2.0..2.0f64,
        rs1 in 0.0..2.0f64,
        rs2 in 0.0..2.0f64,
        eng in 0.0..=1.0f64,
        d in difficulty(),
        fmt in format(),
    ) {
        let (lo, hi) = (rs1.min(rs2), rs1.max(rs2));
        let light = p_correct_mean(&StudentParams::new(theta, lo), d, fmt, eng);
        let heavy = p_correct_mean(&StudentParams::new(theta, hi), d, fmt, eng);
        prop_assert!(heavy <= light);
    }

    /// Test 5: Heavier formats never help
    #[test]
    fn prop_p_correct_non_increasing_in_reading_load(
        theta in -2.0..2.0f64,
        rs in 0.0..2.0f64,
        eng in 0.0..=1.0f64,
        d in difficulty(),
        f1 in format(),
        f2 in format(),
    ) {
        let (light_fmt, heavy_fmt) = if f1.reading_load() <= f2.reading_load() {
            (f1, f2)
        } else {
            (f2, f1)
        };
        let params = StudentParams::new(theta, rs);
        let light = p_correct_mean(&params, d, light_fmt, eng);
        let heavy = p_correct_mean(&params, d, heavy_fmt, eng);
        prop_assert!(heavy <= light);
    }

    /// Test 6: Skill and engagement never hurt
    #[test]
    fn prop_p_correct_non_decreasing_in_theta_and_engagement(
        t1 in -2.0..2.0f64,
        t2 in -2.0..2.0f64,
        e1 in 0.0..=1.0f64,
        e2 in 0.0..=1.0f64,
        rs in 0.0..2.0f64,
        d in difficulty(),
        fmt in format(),
    ) {
        let (tl, th) = (t1.min(t2), t1.max(t2));
        let (el, eh) = (e1.min(e2), e1.max(e2));
        let p_low = p_correct_mean(&StudentParams::new(tl, rs), d, fmt, el);
        let p_high_theta = p_correct_mean(&StudentParams::new(th, rs), d, fmt, el);
        let p_high_eng = p_correct_mean(&StudentParams::new(tl, rs), d, fmt, eh);
        prop_assert!(p_high_theta >= p_low);
        prop_assert!(p_high_eng >= p_low);
        prop_assert!((0.0..=1.0).contains(&p_low));
    }

    /// Test 7: Engagement stays in [0, 1] and a miss never beats a hit
    #[test]
    fn prop_engagement_clamped(
        theta in -2.0..2.0f64,
        rs in 0.0..2.0f64,
        eng in 0.0..=1.0f64,
        d in difficulty(),
        fmt in format(),
    ) {
        let params = StudentParams::new(theta, rs);
        let hit = step_engagement(&params, d, fmt, eng, true);
        let miss = step_engagement(&params, d, fmt, eng, false);
        prop_assert!((0.0..=1.0).contains(&hit));
        prop_assert!((0.0..=1.0).contains(&miss));
        prop_assert!(miss <= hit);
    }

    /// Test 8: Uncertainty never grows and never drops below the floor
    #[test]
    fn prop_belief_update_bounds(
        estimate in -3.0..=3.0f64,
        uncertainty in 0.2..=5.0f64,
        d in difficulty(),
        load in 0.0..=1.0f64,
        correct in any::<bool>(),
    ) {
        let (new_estimate, new_uncertainty) =
            update_belief(estimate, uncertainty, d, load, correct);
        prop_assert!(new_uncertainty <= uncertainty);
        prop_assert!(new_uncertainty >= 0.2);
        prop_assert!((-3.0..=3.0).contains(&new_estimate));
        if correct {
            prop_assert!(new_estimate >= estimate);
        } else {
            prop_assert!(new_estimate <= estimate);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Test 9: Same seed and action sequence give identical outcomes
    #[test]
    fn prop_environment_deterministic(
        seed in any::<u64>(),
        actions in prop::collection::vec(0usize..Action::COUNT, 1..25),
    ) {
        let bank = Arc::new(QuestionBank::from_items(generate_bank(2, 0).unwrap()));
        let config = EnvConfig { max_steps: 20, seed: 0 };
        let mut a = TutorEnv::new(Arc::clone(&bank), config.clone());
        let mut b = TutorEnv::new(bank, config);

        prop_assert_eq!(a.reset(Some(seed)), b.reset(Some(seed)));
        for i in actions {
            let action = Action::new(i).unwrap();
            let (oa, ob) = (a.step(action), b.step(action));
            match (oa, ob) {
                (Ok(x), Ok(y)) => {
                    prop_assert_eq!(&x, &y);
                    if x.is_done() {
                        break;
                    }
                }
                (x, y) => prop_assert!(false, "diverged: {:?} vs {:?}", x, y),
            }
        }
    }
}
