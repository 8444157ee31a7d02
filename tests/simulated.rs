use fprint_enroll::sim::{synthetic_print, MinutiaeExtractor, OverlapComparator, ScriptedSensor};
use fprint_enroll::{
    AttemptStatus, CaptureError, EnrollmentCoordinator, EnrollmentOutcome,
    ImageFlags, NullNotifier, RawSample, RejectReason, TracingNotifier,
};

const WIDTH: u32 = 32;
const HEIGHT: u32 = 32;

/// `count` minutiae laid out row by row, starting at index `offset`.
fn minutiae(offset: u32, count: u32) -> Vec<(u32, u32)> {
    (offset..offset + count).map(|i| (i % WIDTH, i / WIDTH)).collect()
}

fn print(offset: u32, count: u32) -> Result<RawSample, CaptureError> {
    Ok(synthetic_print(WIDTH, HEIGHT, &minutiae(offset, count)))
}

#[test]
fn enrolls_the_central_print() {
    // overlaps: a-b 30/40, b-c 30/40, a-c 20/40 -> b is central
    let sensor = ScriptedSensor::new(vec![print(0, 40), print(10, 40), print(20, 40)]);
    let mut coordinator = EnrollmentCoordinator::new(
        sensor,
        MinutiaeExtractor::default(),
        OverlapComparator,
        TracingNotifier,
    );

    let (outcome, report) = coordinator.enroll_with_report();

    let ballot = report.ballot.unwrap();
    assert_eq!(ballot.winner, 1);
    assert_eq!(ballot.supporting, [75, 75]);
    match outcome {
        EnrollmentOutcome::Completed { template, sample } => {
            assert_eq!(template.feature_count(), 40);
            assert_eq!(template.minutiae[0].x, 10);
            let sample = sample.unwrap();
            let expected = synthetic_print(WIDTH, HEIGHT, &minutiae(10, 40));
            assert_eq!(sample.digest12(), expected.digest12());
        }
        other => panic!("expected completed enrollment, got {other:?}"),
    }
}

#[test]
fn standardizes_flipped_frames_before_extraction() {
    let mut flipped = synthetic_print(WIDTH, HEIGHT, &minutiae(0, 40));
    flipped.data.reverse();
    let flipped = flipped.with_flags(ImageFlags {
        v_flipped: true,
        h_flipped: true,
        colors_inverted: false,
    });

    let sensor = ScriptedSensor::new(vec![Ok(flipped), print(0, 40), print(0, 30)]);
    let mut coordinator = EnrollmentCoordinator::new(
        sensor,
        MinutiaeExtractor::default(),
        OverlapComparator,
        NullNotifier,
    );

    let (outcome, report) = coordinator.enroll_with_report();

    // the flipped frame matches its upright twin perfectly once standardized
    assert_eq!(report.scores.map(|s| s.s01), Some(100));
    assert!(outcome.is_completed());
    assert!(outcome.sample().unwrap().flags.is_standard());
}

#[test]
fn rejects_insane_and_sparse_frames() {
    let sensor = ScriptedSensor::new(vec![
        Ok(RawSample::new(WIDTH, HEIGHT, vec![0; 10])),
        print(0, 15),
        Err(CaptureError::Device("usb stall".to_string())),
        print(0, 40),
        print(0, 40),
        print(0, 40),
    ]);
    let mut coordinator = EnrollmentCoordinator::new(
        sensor,
        MinutiaeExtractor::default(),
        OverlapComparator,
        NullNotifier,
    );

    let (outcome, report) = coordinator.enroll_with_report();

    assert!(matches!(
        report.records[0].status,
        AttemptStatus::Rejected(RejectReason::Capture(CaptureError::InsaneImage(_)))
    ));
    assert_eq!(
        report.records[1].status,
        AttemptStatus::Rejected(RejectReason::LowFeatures { found: 15, required: 20 })
    );
    assert!(report.records[1].digest.is_some());
    assert_eq!(report.records[2].digest, None);
    assert_eq!(report.accepted, 3);
    assert_eq!(coordinator.sensor().captures(), 6);
    assert_eq!(coordinator.sensor().remaining(), 0);

    // identical prints: full tie, nothing stands out
    assert!(outcome.is_failed());
}

#[test]
fn empty_frame_is_a_capture_failure_without_digest() {
    let sensor = ScriptedSensor::new(vec![
        Ok(RawSample::new(WIDTH, HEIGHT, Vec::new())),
        print(0, 40),
        print(10, 40),
        print(20, 40),
        print(30, 40),
    ]);
    let mut coordinator = EnrollmentCoordinator::new(
        sensor,
        MinutiaeExtractor::default(),
        OverlapComparator,
        NullNotifier,
    );

    let (outcome, report) = coordinator.enroll_with_report();

    assert_eq!(
        report.records[0].status,
        AttemptStatus::Rejected(RejectReason::Capture(CaptureError::NoData))
    );
    assert_eq!(report.records[0].digest, None);
    assert!(outcome.is_completed());
    // stops after the third accepted print, the fourth stays queued
    assert_eq!(coordinator.sensor().remaining(), 1);
}

#[test]
fn exhausted_sensor_times_out_into_failure() {
    let mut coordinator = EnrollmentCoordinator::new(
        ScriptedSensor::default(),
        MinutiaeExtractor::default(),
        OverlapComparator,
        NullNotifier,
    );

    let (outcome, report) = coordinator.enroll_with_report();

    assert!(outcome.is_failed());
    assert_eq!(coordinator.sensor().captures(), 6);
    assert!(report
        .records
        .iter()
        .all(|r| r.status == AttemptStatus::Rejected(RejectReason::Capture(CaptureError::Timeout))));
}

#[test]
fn report_renders_every_attempt() {
    let sensor = ScriptedSensor::new(vec![print(0, 40), print(0, 5), print(10, 40)]);
    let mut coordinator = EnrollmentCoordinator::new(
        sensor,
        MinutiaeExtractor::default(),
        OverlapComparator,
        NullNotifier,
    );

    let (outcome, report) = coordinator.enroll_with_report();
    assert!(outcome.is_retry());

    let text = report.to_string();
    assert!(text.contains("outcome  = retry"));
    assert!(text.contains("#1 accepted slot=0 features=40"));
    assert!(text.contains("#2 rejected (not enough features, 5/20)"));
    assert!(text.contains("not enough good samples (2 accepted)"));
}
