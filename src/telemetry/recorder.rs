//! Optional JSON-lines record of a tracking session.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use super::message::TelemetryMessage;
use crate::session::BoundingBox;

#[derive(Serialize)]
struct StartRecord<'a> {
    event: &'static str,
    timestamp: String,
    source: &'a str,
}

#[derive(Serialize)]
struct TrackRecord {
    event: &'static str,
    timestamp: String,
    tick: u64,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    center_x: i64,
    center_y: i64,
}

#[derive(Serialize)]
struct EndRecord {
    event: &'static str,
    timestamp: String,
    reason: &'static str,
    frames_tracked: u64,
}

/// Append-only JSONL record of one session.
///
/// One `session_start` line, one `track` line per tick, one
/// `session_end` line; timestamps are RFC 3339 UTC. Each line is flushed
/// as it is written so the file can be tailed live. Write failures are
/// surfaced to the caller, which treats them like telemetry faults:
/// logged, never fatal.
pub struct TrackRecorder {
    writer: Box<dyn Write + Send>,
}

impl TrackRecorder {
    /// Create or truncate the record file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Record into any writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// Write the `session_start` line naming the capture source.
    pub fn record_start(&mut self, source: &str) -> io::Result<()> {
        self.write_line(&StartRecord {
            event: "session_start",
            timestamp: timestamp_now(),
            source,
        })
    }

    /// Write one `track` line for a tick's geometry.
    pub fn record_tick(
        &mut self,
        tick: u64,
        region: BoundingBox,
        message: &TelemetryMessage,
    ) -> io::Result<()> {
        self.write_line(&TrackRecord {
            event: "track",
            timestamp: timestamp_now(),
            tick,
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            center_x: message.center_x,
            center_y: message.center_y,
        })
    }

    /// Write the closing `session_end` line.
    pub fn record_end(&mut self, reason: &'static str, frames_tracked: u64) -> io::Result<()> {
        self.write_line(&EndRecord {
            event: "session_end",
            timestamp: timestamp_now(),
            reason,
            frames_tracked,
        })
    }

    fn write_line(&mut self, record: &impl Serialize) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}
