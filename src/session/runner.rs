//! The orchestration loop: capture, select, track, render, report.

use tracing::{debug, info, warn};

use super::overlay::{self, OverlayStyle};
use super::run_state::RunState;
use crate::error::SessionError;
use crate::integration::{FrameSource, OperatorUi, Selection, TargetTracker};
use crate::telemetry::{TelemetryMessage, TelemetrySender, TrackRecorder};

/// Knobs for a tracking session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Overlay stroke appearance
    pub overlay: OverlayStyle,
}

/// Why a session finished cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The operator declined to select a region
    SelectionCancelled,
    /// The source reported end-of-stream, or a read failed mid-run
    StreamEnded,
    /// The operator pressed the quit key
    OperatorQuit,
}

impl ExitReason {
    /// Stable lowercase name used in logs and the track record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectionCancelled => "selection_cancelled",
            Self::StreamEnded => "stream_ended",
            Self::OperatorQuit => "operator_quit",
        }
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Why the run ended
    pub exit: ExitReason,
    /// Ticks that ran a `track` call
    pub frames_tracked: u64,
    /// Telemetry datagrams handed to the socket
    pub telemetry_sent: u64,
    /// Telemetry sends that failed, were logged, and were skipped
    pub telemetry_failures: u64,
}

/// The end-to-end tracking loop.
///
/// Composes a frame source, a tracking model, and an operator display
/// into the run/terminate state machine, with optional UDP telemetry
/// and JSONL record sinks. Single-threaded and synchronous: each tick
/// performs one blocking read, one blocking `track`, one render and
/// present, one best-effort telemetry send, and one quit poll, in that
/// order.
///
/// [`run`](TrackingSession::run) consumes the session, so every exit
/// path, clean or fatal, drops the collaborators and with them the
/// capture handle, any display windows, and the telemetry socket.
pub struct TrackingSession<S, T, U>
where
    S: FrameSource,
    T: TargetTracker,
    U: OperatorUi,
{
    source: S,
    tracker: T,
    ui: U,
    telemetry: Option<TelemetrySender>,
    recorder: Option<TrackRecorder>,
    config: SessionConfig,
    state: RunState,
}

impl<S, T, U> TrackingSession<S, T, U>
where
    S: FrameSource,
    T: TargetTracker,
    U: OperatorUi,
{
    /// Create a session over the three collaborators.
    pub fn new(source: S, tracker: T, ui: U, config: SessionConfig) -> Self {
        Self {
            source,
            tracker,
            ui,
            telemetry: None,
            recorder: None,
            config,
            state: RunState::default(),
        }
    }

    /// Create a session with default configuration.
    pub fn with_default_config(source: S, tracker: T, ui: U) -> Self {
        Self::new(source, tracker, ui, SessionConfig::default())
    }

    /// Stream per-frame geometry to a UDP consumer.
    pub fn with_telemetry(mut self, sender: TelemetrySender) -> Self {
        self.telemetry = Some(sender);
        self
    }

    /// Record per-frame geometry to a JSONL sink.
    pub fn with_recorder(mut self, recorder: TrackRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Drive the session to completion.
    ///
    /// Clean exits (cancelled selection, end of stream, operator quit)
    /// return a [`SessionReport`]; fatal conditions return a
    /// [`SessionError`] naming the failed stage.
    pub fn run(mut self) -> Result<SessionReport, SessionError> {
        let result = self.drive();
        if self.state != RunState::Terminated {
            self.advance(RunState::Terminated);
        }
        result
    }

    fn drive(&mut self) -> Result<SessionReport, SessionError> {
        // Acquire the first frame
        let first = match self.source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Err(SessionError::NoInitialFrame { source: None }),
            Err(e) => {
                return Err(SessionError::NoInitialFrame {
                    source: Some(Box::new(e)),
                });
            }
        };
        self.advance(RunState::AwaitingSelection);
        info!(
            width = first.width(),
            height = first.height(),
            "first frame acquired"
        );

        // One-shot region selection
        let raw = self
            .ui
            .select_region(&first)
            .map_err(|e| SessionError::Selection {
                source: Box::new(e),
            })?;
        let region = match Selection::from_box(raw) {
            Selection::Region(region) => region,
            Selection::Cancelled => {
                info!("selection cancelled by operator");
                return Ok(self.finish(ExitReason::SelectionCancelled, 0, 0, 0));
            }
        };

        // Bind the model to the selected target
        self.tracker
            .initialize(&first, region)
            .map_err(|e| SessionError::TrackerInit {
                region,
                source: Box::new(e),
            })?;
        self.advance(RunState::Tracking);
        info!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            "target locked"
        );

        // Tick loop
        let mut ticks: u64 = 0;
        let mut sent: u64 = 0;
        let mut failures: u64 = 0;
        let exit = loop {
            let frame = match self.source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break ExitReason::StreamEnded,
                Err(e) => {
                    warn!(error = %e, "frame read failed, treating as end of stream");
                    break ExitReason::StreamEnded;
                }
            };
            ticks += 1;

            let region =
                self.tracker
                    .track(&frame)
                    .map_err(|e| SessionError::TrackerUpdate {
                        tick: ticks,
                        source: Box::new(e),
                    })?;
            if region.is_empty() {
                debug!(tick = ticks, "tracker reported no target this frame");
            } else {
                debug!(
                    tick = ticks,
                    x = region.x,
                    y = region.y,
                    width = region.width,
                    height = region.height,
                    "tracked"
                );
            }

            let annotated = overlay::render(&frame, region, &self.config.overlay);
            self.ui.present(&annotated).map_err(|e| SessionError::Ui {
                tick: ticks,
                source: Box::new(e),
            })?;

            let message = TelemetryMessage::from_region(region);
            if let Some(sender) = &self.telemetry {
                match sender.send(&message) {
                    Ok(()) => sent += 1,
                    Err(e) => {
                        failures += 1;
                        warn!(error = %e, tick = ticks, "telemetry send failed, continuing");
                    }
                }
            }
            if let Some(recorder) = &mut self.recorder {
                if let Err(e) = recorder.record_tick(ticks, region, &message) {
                    warn!(error = %e, tick = ticks, "track record write failed, continuing");
                }
            }

            match self.ui.poll_quit() {
                Ok(true) => break ExitReason::OperatorQuit,
                Ok(false) => {}
                Err(e) => {
                    return Err(SessionError::Ui {
                        tick: ticks,
                        source: Box::new(e),
                    });
                }
            }
        };

        Ok(self.finish(exit, ticks, sent, failures))
    }

    fn finish(&mut self, exit: ExitReason, ticks: u64, sent: u64, failures: u64) -> SessionReport {
        self.advance(RunState::Terminated);
        if let Some(recorder) = &mut self.recorder {
            if let Err(e) = recorder.record_end(exit.as_str(), ticks) {
                warn!(error = %e, "track record close failed");
            }
        }
        info!(
            reason = exit.as_str(),
            frames_tracked = ticks,
            "session finished"
        );
        SessionReport {
            exit,
            frames_tracked: ticks,
            telemetry_sent: sent,
            telemetry_failures: failures,
        }
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }
}
