use std::io::{self, Write};
use std::net::UdpSocket;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lockon::integration::{ScriptedSource, ScriptedStep, ScriptedTracker, ScriptedUi, SourceStep};
use lockon::telemetry::{TelemetrySender, TrackRecorder};
use lockon::{BoundingBox, ExitReason, Frame, SessionError, TrackingSession};

fn gray(width: usize, height: usize) -> Frame {
    Frame::filled(width, height, [128, 128, 128])
}

#[test]
fn test_selection_consumes_the_first_frame() {
    // A single-frame stream: the frame goes to selection, then the very
    // first tick hits end of stream.
    let source = ScriptedSource::gray_frames(1, 64, 48);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(4.0, 4.0, 8.0, 8.0)]);
    let tracker_calls = tracker.calls();
    let selection = BoundingBox::new(10.0, 10.0, 50.0, 40.0);
    let ui = ScriptedUi::selecting(selection);
    let ui_calls = ui.calls();

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap();

    assert_eq!(report.exit, ExitReason::StreamEnded);
    assert_eq!(report.frames_tracked, 0);
    assert_eq!(report.telemetry_sent, 0);
    let ui_calls = ui_calls.lock().unwrap();
    assert_eq!(ui_calls.select_count, 1);
    assert_eq!(ui_calls.present_count, 0);
    let tracker_calls = tracker_calls.lock().unwrap();
    assert_eq!(tracker_calls.initializations, vec![selection]);
    assert_eq!(tracker_calls.track_count, 0);
}

#[test]
fn test_cancelled_selection_touches_nothing_downstream() {
    let source = ScriptedSource::gray_frames(5, 64, 48);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(1.0, 1.0, 2.0, 2.0)]);
    let tracker_calls = tracker.calls();
    let ui = ScriptedUi::cancelling();
    let ui_calls = ui.calls();

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap();

    assert_eq!(report.exit, ExitReason::SelectionCancelled);
    assert_eq!(report.frames_tracked, 0);
    assert_eq!(report.telemetry_sent, 0);
    let calls = tracker_calls.lock().unwrap();
    assert!(calls.initializations.is_empty());
    assert_eq!(calls.track_count, 0);
    assert_eq!(ui_calls.lock().unwrap().present_count, 0);
}

#[test]
fn test_zero_size_selection_cancels_regardless_of_position() {
    // Only width and height make the selection the cancellation
    // sentinel; the position is ignored.
    let source = ScriptedSource::gray_frames(3, 64, 48);
    let tracker = ScriptedTracker::reporting([]);
    let tracker_calls = tracker.calls();
    let ui = ScriptedUi::selecting(BoundingBox::new(7.0, 9.0, 0.0, 0.0));

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap();

    assert_eq!(report.exit, ExitReason::SelectionCancelled);
    assert!(tracker_calls.lock().unwrap().initializations.is_empty());
}

#[test]
fn test_telemetry_datagrams_reach_the_consumer() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let endpoint = receiver.local_addr().unwrap();

    let source = ScriptedSource::gray_frames(3, 320, 240);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(100.0, 100.0, 20.0, 20.0)]);
    let ui = ScriptedUi::selecting(BoundingBox::new(100.0, 100.0, 20.0, 20.0));

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .with_telemetry(TelemetrySender::new(endpoint).unwrap())
        .run()
        .unwrap();

    assert_eq!(report.frames_tracked, 2);
    assert_eq!(report.telemetry_sent, 2);
    assert_eq!(report.telemetry_failures, 0);

    let mut buf = [0u8; 64];
    for _ in 0..2 {
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"110,110,20,20");
    }
}

#[test]
fn test_lost_target_sentinel_is_reported_as_is() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let endpoint = receiver.local_addr().unwrap();

    // An empty script reports the sentinel box on every track call.
    let source = ScriptedSource::gray_frames(2, 64, 48);
    let tracker = ScriptedTracker::new([]);
    let ui = ScriptedUi::selecting(BoundingBox::new(5.0, 5.0, 10.0, 10.0));

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .with_telemetry(TelemetrySender::new(endpoint).unwrap())
        .run()
        .unwrap();

    assert_eq!(report.frames_tracked, 1);
    let mut buf = [0u8; 64];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], b"0,0,0,0");
}

#[test]
fn test_telemetry_send_failure_does_not_stop_the_loop() {
    // The kernel refuses datagrams addressed to port 0, so every send
    // fails; the session must still run the stream to completion.
    let sender = TelemetrySender::new("127.0.0.1:0".parse().unwrap()).unwrap();

    let source = ScriptedSource::gray_frames(7, 64, 48);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(2.0, 2.0, 6.0, 6.0)]);
    let ui = ScriptedUi::selecting(BoundingBox::new(2.0, 2.0, 6.0, 6.0));
    let ui_calls = ui.calls();

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .with_telemetry(sender)
        .run()
        .unwrap();

    assert_eq!(report.exit, ExitReason::StreamEnded);
    assert_eq!(report.frames_tracked, 6);
    assert_eq!(report.telemetry_sent, 0);
    assert_eq!(report.telemetry_failures, 6);
    assert_eq!(ui_calls.lock().unwrap().present_count, 6);
}

#[test]
fn test_operator_quit_ends_the_run_after_the_tick() {
    let source = ScriptedSource::gray_frames(10, 64, 48);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(3.0, 3.0, 4.0, 4.0)]);
    let ui = ScriptedUi::selecting_then_quit(BoundingBox::new(3.0, 3.0, 4.0, 4.0), 3);
    let ui_calls = ui.calls();

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap();

    assert_eq!(report.exit, ExitReason::OperatorQuit);
    // The quit key is seen at the end of the third tick, after that
    // tick's frame has been tracked and presented.
    assert_eq!(report.frames_tracked, 3);
    let calls = ui_calls.lock().unwrap();
    assert_eq!(calls.present_count, 3);
    assert_eq!(calls.poll_count, 3);
}

#[test]
fn test_tracker_failure_mid_run_is_fatal() {
    let source = ScriptedSource::gray_frames(5, 64, 48);
    let tracker = ScriptedTracker::new([
        ScriptedStep::Report(BoundingBox::new(1.0, 1.0, 2.0, 2.0)),
        ScriptedStep::Fail,
    ]);
    let ui = ScriptedUi::selecting(BoundingBox::new(1.0, 1.0, 2.0, 2.0));
    let ui_calls = ui.calls();

    let err = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap_err();

    match err {
        SessionError::TrackerUpdate { tick, .. } => assert_eq!(tick, 2),
        other => panic!("expected TrackerUpdate, got {other:?}"),
    }
    // The first tick completed before the failure.
    assert_eq!(ui_calls.lock().unwrap().present_count, 1);
}

#[test]
fn test_rejected_initialize_is_fatal() {
    let source = ScriptedSource::gray_frames(3, 64, 48);
    let tracker = ScriptedTracker::rejecting_initialize();
    let region = BoundingBox::new(10.0, 10.0, 30.0, 30.0);
    let ui = ScriptedUi::selecting(region);

    let err = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap_err();

    match err {
        SessionError::TrackerInit { region: r, .. } => assert_eq!(r, region),
        other => panic!("expected TrackerInit, got {other:?}"),
    }
}

#[test]
fn test_mid_run_read_failure_is_a_clean_end_of_stream() {
    let source = ScriptedSource::new([
        SourceStep::Yield(gray(64, 48)),
        SourceStep::Yield(gray(64, 48)),
        SourceStep::Fail,
    ]);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(1.0, 1.0, 2.0, 2.0)]);
    let ui = ScriptedUi::selecting(BoundingBox::new(1.0, 1.0, 2.0, 2.0));

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap();

    assert_eq!(report.exit, ExitReason::StreamEnded);
    assert_eq!(report.frames_tracked, 1);
}

#[test]
fn test_source_without_a_first_frame_is_fatal() {
    let source = ScriptedSource::new([]);
    let tracker = ScriptedTracker::reporting([]);
    let ui = ScriptedUi::selecting(BoundingBox::new(1.0, 1.0, 2.0, 2.0));
    let ui_calls = ui.calls();

    let err = TrackingSession::with_default_config(source, tracker, ui)
        .run()
        .unwrap_err();

    assert!(matches!(err, SessionError::NoInitialFrame { .. }));
    assert_eq!(ui_calls.lock().unwrap().select_count, 0);
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_track_log_records_the_whole_session() {
    let buf = SharedBuf::default();
    let mut recorder = TrackRecorder::from_writer(buf.clone());
    recorder.record_start("device 0").unwrap();

    let source = ScriptedSource::gray_frames(4, 64, 48);
    let tracker = ScriptedTracker::reporting([BoundingBox::new(100.0, 100.0, 20.0, 20.0)]);
    let ui = ScriptedUi::selecting(BoundingBox::new(100.0, 100.0, 20.0, 20.0));

    let report = TrackingSession::with_default_config(source, tracker, ui)
        .with_recorder(recorder)
        .run()
        .unwrap();
    assert_eq!(report.frames_tracked, 3);

    let bytes = buf.0.lock().unwrap().clone();
    let records: Vec<serde_json::Value> = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["event"], "session_start");
    assert_eq!(records[1]["event"], "track");
    assert_eq!(records[1]["tick"], 1);
    assert_eq!(records[1]["center_x"], 110);
    assert_eq!(records[3]["tick"], 3);
    assert_eq!(records[4]["event"], "session_end");
    assert_eq!(records[4]["reason"], "stream_ended");
    assert_eq!(records[4]["frames_tracked"], 3);
}
