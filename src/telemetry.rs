//! Outbound tracking geometry: wire encoding, UDP transport, and the
//! optional JSONL session record.

mod message;
mod recorder;
mod sender;

pub use message::TelemetryMessage;
pub use recorder::TrackRecorder;
pub use sender::TelemetrySender;
