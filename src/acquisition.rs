//! # Acquisition Loop
//!
//! Single-task orchestration of the receive-fuse-persist cycle.
//!
//! The loop moves through `Connecting -> Listening <-> Flushing`, with any
//! state able to reach `Terminated`:
//! - Connecting: send the one-time handshake; transport failure is fatal.
//! - Listening: each received frame is fused with a position fix and a
//!   heading sample and appended to the buffer. Malformed frames are logged
//!   and dropped. Once the configured flush interval has elapsed, the loop
//!   flushes.
//! - Flushing: drain the buffer and append the batch to the output log,
//!   then reset the flush clock.
//! - Terminated: reached on link loss or Ctrl+C; performs one best-effort
//!   final flush of whatever is buffered (nothing, if no frame was ever
//!   received) before returning.
//!
//! The buffer and the flush clock are owned exclusively by the loop, so no
//! locking is needed. Cancellation is only observed between cycles, never
//! mid-write.

use std::time::{Duration, Instant};

use tokio::signal;
use tracing::{debug, info, warn};

use crate::buffer::FusionBuffer;
use crate::compass::heading::to_cardinal;
use crate::compass::{Compass, MagRegisters};
use crate::error::{Result, SolarLogError};
use crate::link::frame::TelemetryFrame;
use crate::link::transport::FrameTransport;
use crate::link::TelemetryLink;
use crate::location::PositionSource;
use crate::record::FusedRecord;
use crate::storage::RecordWriter;

/// Outcome of one wait on the link
enum LoopEvent {
    Frame(Result<TelemetryFrame>),
    Interrupted,
}

/// Orchestrates link, sensors, buffer and writer into one run loop
pub struct AcquisitionLoop<T, P, D>
where
    T: FrameTransport,
    P: PositionSource,
    D: MagRegisters,
{
    link: TelemetryLink<T>,
    position: P,
    compass: Compass<D>,
    writer: RecordWriter,
    buffer: FusionBuffer,
    handshake: String,
    flush_interval: Duration,
    last_flush: Instant,
    frames_received: u64,
    frames_dropped: u64,
}

impl<T, P, D> AcquisitionLoop<T, P, D>
where
    T: FrameTransport,
    P: PositionSource,
    D: MagRegisters,
{
    pub fn new(
        link: TelemetryLink<T>,
        position: P,
        compass: Compass<D>,
        writer: RecordWriter,
        handshake: String,
        flush_interval: Duration,
    ) -> Self {
        Self {
            link,
            position,
            compass,
            writer,
            buffer: FusionBuffer::new(),
            handshake,
            flush_interval,
            last_flush: Instant::now(),
            frames_received: 0,
            frames_dropped: 0,
        }
    }

    /// Run the acquisition loop until the link drops or an interrupt arrives
    ///
    /// # Errors
    ///
    /// * `Connection` - the handshake could not be sent at startup
    /// * `Persistence` - a flush failed; surfaced as fatal rather than
    ///   silently losing buffered records
    ///
    /// Link loss mid-run and Ctrl+C are normal terminations: both trigger
    /// the final flush and return `Ok`.
    pub async fn run(&mut self) -> Result<()> {
        self.link.send_handshake(&self.handshake).await?;
        info!("Handshake sent to {}, listening for telemetry", self.link.peer());

        self.last_flush = Instant::now();

        loop {
            let event = tokio::select! {
                frame = self.link.receive_frame() => LoopEvent::Frame(frame),
                _ = signal::ctrl_c() => LoopEvent::Interrupted,
            };

            match event {
                LoopEvent::Frame(Ok(frame)) => {
                    self.ingest(frame).await;

                    if self.last_flush.elapsed() >= self.flush_interval {
                        self.flush()?;
                    }
                }
                LoopEvent::Frame(Err(SolarLogError::MalformedFrame(reason))) => {
                    warn!("Dropping malformed frame: {}", reason);
                    self.frames_dropped += 1;
                }
                LoopEvent::Frame(Err(e)) => {
                    warn!("Link lost: {}", e);
                    return self.terminate();
                }
                LoopEvent::Interrupted => {
                    info!("Interrupt received, shutting down");
                    return self.terminate();
                }
            }
        }
    }

    /// Fuse one frame with freshly sampled position and orientation
    ///
    /// Both sensor sources are independently fault-tolerant: an unavailable
    /// position becomes the sentinel fix, a failed orientation read leaves
    /// heading and cardinal absent. The frame is always buffered.
    async fn ingest(&mut self, frame: TelemetryFrame) {
        let fix = self.position.query().await;
        let heading = self.compass.sample_heading();
        let cardinal = heading.map(to_cardinal);

        if fix.valid {
            debug!("Position: {:.6}, {:.6}", fix.lat, fix.lon);
        }

        self.buffer.append(FusedRecord::new(fix, heading, cardinal, frame));
        self.frames_received += 1;
    }

    /// Drain the buffer and persist the batch, then reset the flush clock
    fn flush(&mut self) -> Result<()> {
        let records = self.buffer.drain_all();

        if !records.is_empty() {
            self.writer.ensure_header()?;
            self.writer.append_records(&records)?;
            debug!("Flushed {} record(s)", records.len());
        }

        self.last_flush = Instant::now();
        Ok(())
    }

    /// One best-effort final flush before releasing the connection
    fn terminate(&mut self) -> Result<()> {
        let buffered = self.buffer.len();
        if buffered > 0 {
            self.flush()?;
            info!("Final flush wrote {} buffered record(s)", buffered);
        }

        info!(
            "Run finished: {} frame(s) fused, {} dropped",
            self.frames_received, self.frames_dropped
        );
        Ok(())
    }
}
