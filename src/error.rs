//! Error types for capture, session, and telemetry failures.
//!
//! Clean exits (cancelled selection, end of stream, operator quit) are not
//! errors; the session reports them through
//! [`SessionReport`](crate::session::SessionReport). Everything here is
//! either fatal for the run or, in the telemetry case, recovered locally.

use std::net::SocketAddr;

use thiserror::Error;

use crate::session::BoundingBox;

/// Boxed error from a collaborator behind one of the integration traits.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to acquire the video source at startup.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The source would not open. Carries the identifying source (device
    /// index or URL/path) for the operator-facing report.
    #[error("failed to open video source {source_id}")]
    SourceUnavailable { source_id: String },
    /// The capture backend itself errored while opening.
    #[error("video capture backend error for {source_id}: {detail}")]
    Backend { source_id: String, detail: String },
}

/// Fatal session failures, one variant per stage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The first frame could not be read from the source.
    #[error("no initial frame could be read from the video source")]
    NoInitialFrame {
        #[source]
        source: Option<CollaboratorError>,
    },
    /// The interactive collaborator failed during region selection.
    /// Distinct from a declined selection, which is a clean exit.
    #[error("region selection failed")]
    Selection {
        #[source]
        source: CollaboratorError,
    },
    /// The display collaborator failed while presenting or polling.
    #[error("display failed on frame {tick}")]
    Ui {
        tick: u64,
        #[source]
        source: CollaboratorError,
    },
    /// The tracking model rejected the initial frame/region pair.
    #[error("tracker rejected initial region {region:?}")]
    TrackerInit {
        region: BoundingBox,
        #[source]
        source: CollaboratorError,
    },
    /// The tracking model failed mid-run. There is no recovery protocol
    /// for a corrupted tracker state, so the session terminates.
    #[error("tracker failed on frame {tick}")]
    TrackerUpdate {
        tick: u64,
        #[source]
        source: CollaboratorError,
    },
}

/// Telemetry transport failures.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The local socket could not be acquired at construction.
    #[error("failed to bind telemetry socket: {0}")]
    Bind(#[source] std::io::Error),
    /// A datagram could not be handed to the transport. The session logs
    /// this and moves on to the next frame; it never propagates.
    #[error("telemetry send to {endpoint} failed: {source}")]
    Send {
        endpoint: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
