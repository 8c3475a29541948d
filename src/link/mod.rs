//! # Telemetry Link Module
//!
//! Handles the Bluetooth RFCOMM connection to the remote sensor node.
//!
//! This module handles:
//! - Connecting to the node's RFCOMM service at startup
//! - Sending the one-time handshake message
//! - Receiving and parsing inbound telemetry frames
//! - Surfacing transport loss so the acquisition loop can shut down

pub mod frame;
pub mod transport;

use bluer::rfcomm::{SocketAddr, Stream};
use tracing::{debug, info};

use crate::error::{Result, SolarLogError};
use frame::{parse_frame, TelemetryFrame};
use transport::{FrameTransport, RfcommTransport};

/// Receive buffer size in bytes; one telemetry message is far smaller
const RECV_BUFFER_SIZE: usize = 1024;

/// Wireless link to the remote sensor node
///
/// Owns the transport and converts its byte stream into telemetry frames.
pub struct TelemetryLink<T: FrameTransport> {
    transport: T,
    peer: String,
}

impl std::fmt::Debug for TelemetryLink<RfcommTransport> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLink")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

impl TelemetryLink<RfcommTransport> {
    /// Connect to the remote sensor node
    ///
    /// # Arguments
    ///
    /// * `address` - Bluetooth address of the node (e.g. "C0:49:EF:69:A6:3A")
    /// * `channel` - RFCOMM channel of the node's serial service
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - Established link or error
    ///
    /// # Errors
    ///
    /// Returns `ServiceNotFound` if the address is invalid or the node is
    /// unreachable. A single connection attempt is made; the caller treats
    /// failure as fatal.
    pub async fn connect(address: &str, channel: u8) -> Result<Self> {
        let addr: bluer::Address = address
            .parse()
            .map_err(|e| SolarLogError::ServiceNotFound(format!("{}: {}", address, e)))?;

        debug!("Connecting to {} on RFCOMM channel {}", address, channel);

        let stream = Stream::connect(SocketAddr::new(addr, channel))
            .await
            .map_err(|e| SolarLogError::ServiceNotFound(format!("{}: {}", address, e)))?;

        info!("Connected to sensor node at {}", address);

        Ok(Self {
            transport: RfcommTransport::new(stream),
            peer: address.to_string(),
        })
    }
}

impl<T: FrameTransport> TelemetryLink<T> {
    /// Build a link over an already-established transport
    pub fn new(transport: T, peer: impl Into<String>) -> Self {
        Self {
            transport,
            peer: peer.into(),
        }
    }

    /// Peer address of the connected node
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send the one-time handshake message
    ///
    /// Fire-and-forget: no response is awaited.
    ///
    /// # Errors
    ///
    /// Returns `Connection` if the transport write fails
    pub async fn send_handshake(&mut self, text: &str) -> Result<()> {
        self.transport
            .send(text.as_bytes())
            .await
            .map_err(|e| SolarLogError::Connection(format!("handshake failed: {}", e)))?;

        debug!("Handshake sent ({} bytes)", text.len());
        Ok(())
    }

    /// Receive and parse the next telemetry frame
    ///
    /// Blocks until bytes arrive on the link.
    ///
    /// # Returns
    ///
    /// * `Result<TelemetryFrame>` - Parsed frame
    ///
    /// # Errors
    ///
    /// * `Connection` - transport read failed or the peer closed the link;
    ///   the caller shuts the run down
    /// * `MalformedFrame` - the message was not valid UTF-8 or did not carry
    ///   three numeric tokens; the caller drops it and keeps listening
    pub async fn receive_frame(&mut self) -> Result<TelemetryFrame> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        let n = self
            .transport
            .recv(&mut buf)
            .await
            .map_err(|e| SolarLogError::Connection(format!("receive failed: {}", e)))?;

        if n == 0 {
            return Err(SolarLogError::Connection(format!(
                "link to {} closed by peer",
                self.peer
            )));
        }

        let text = std::str::from_utf8(&buf[..n])
            .map_err(|e| SolarLogError::MalformedFrame(format!("invalid UTF-8: {}", e)))?;

        parse_frame(text)
    }
}
