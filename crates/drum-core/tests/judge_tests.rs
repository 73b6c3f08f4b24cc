// Host-side tests for judgement bands and score accumulation.

use drum_core::*;

#[test]
fn band_boundaries_are_inclusive() {
    let w = JudgeWindows::default();
    assert_eq!(w.judge(0.0), Some(Judgment::Perfect));
    assert_eq!(w.judge(20.0), Some(Judgment::Perfect));
    assert_eq!(w.judge(20.5), Some(Judgment::Good));
    assert_eq!(w.judge(50.0), Some(Judgment::Good));
    assert_eq!(w.judge(50.5), Some(Judgment::Bad));
    assert_eq!(w.judge(100.0), Some(Judgment::Bad));
    assert_eq!(w.judge(100.01), None);
}

#[test]
fn distance_sign_does_not_matter() {
    let w = JudgeWindows::default();
    assert_eq!(w.judge(-20.0), Some(Judgment::Perfect));
    assert_eq!(w.judge(-45.0), Some(Judgment::Good));
    assert_eq!(w.judge(-101.0), None);
}

#[test]
fn points_per_judgement() {
    assert_eq!(Judgment::Perfect.points(), 10);
    assert_eq!(Judgment::Good.points(), 5);
    assert_eq!(Judgment::Bad.points(), 0);
    assert_eq!(MAX_POINTS_PER_NOTE, Judgment::Perfect.points());
}

#[test]
fn labels_match_display() {
    for j in Judgment::ALL {
        assert_eq!(j.to_string(), j.label());
    }
    assert_eq!(Judgment::Perfect.label(), "Perfect");
}

#[test]
fn accumulator_counts_and_conserves() {
    let mut acc = ScoreAccumulator::default();
    acc.record(Judgment::Perfect);
    acc.record(Judgment::Perfect);
    acc.record(Judgment::Good);
    acc.record(Judgment::Bad);
    assert_eq!(acc.total_score, 25);
    assert_eq!(acc.total_judged_notes, 4);
    assert_eq!(
        acc.total_judged_notes,
        acc.perfect_count + acc.good_count + acc.bad_count
    );
    assert_eq!(acc.count(Judgment::Perfect), 2);
    // 25 / 40
    assert_eq!(acc.accuracy(), 62.5);
}

#[test]
fn accuracy_is_zero_without_judged_notes() {
    let acc = ScoreAccumulator::default();
    let a = acc.accuracy();
    assert!(!a.is_nan());
    assert_eq!(a, 0.0);
    assert_eq!(acc.result().accuracy, 0.0);
}

#[test]
fn accuracy_rounds_to_two_decimals() {
    let mut acc = ScoreAccumulator::default();
    acc.record(Judgment::Perfect);
    acc.record(Judgment::Good);
    acc.record(Judgment::Good);
    // 20 / 30 = 66.666..%
    assert_eq!(acc.accuracy(), 66.67);
    assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let mut acc = ScoreAccumulator::default();
    acc.record(Judgment::Perfect);
    let json = serde_json::to_value(acc.result()).unwrap();
    assert_eq!(json["accuracy"], 100.0);
    assert_eq!(json["score"], 10);
    assert_eq!(json["totalNotes"], 1);
    assert_eq!(json["perfectCount"], 1);
    assert_eq!(json["goodCount"], 0);
    assert_eq!(json["badCount"], 0);
}
