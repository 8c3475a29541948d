//! # Location Module
//!
//! Queries the gpsd location feed for the vehicle's position.
//!
//! Position is sampled by running `gpspipe -w -n <N>` and scanning its JSON
//! report lines for the first one that carries both `lat` and `lon`. The
//! query never fails the acquisition cycle: any feed problem is logged and
//! the explicit "no fix" sentinel is substituted instead.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// One position sample from the location feed
///
/// `valid == false` with zero coordinates is the explicit "no fix" sentinel.
/// Zero coordinates with `valid == true` are a legitimate fix on the equator
/// or prime meridian; only the flag distinguishes the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub lat: f64,
    pub lon: f64,
    pub valid: bool,
}

impl PositionFix {
    /// A fix obtained from the feed
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            valid: true,
        }
    }

    /// The explicit "no position available" sentinel
    pub const fn unavailable() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            valid: false,
        }
    }
}

/// Capability interface for position sampling
///
/// Infallible by design: implementations substitute the sentinel on failure
/// so that acquisition never stalls on location unavailability.
#[async_trait]
pub trait PositionSource: Send {
    async fn query(&mut self) -> PositionFix;
}

/// gpsd-backed position source using the `gpspipe` client
pub struct GpsdPipe {
    min_reads: u32,
}

impl GpsdPipe {
    /// # Arguments
    ///
    /// * `min_reads` - Number of gpsd report lines to read per query.
    ///   gpsd emits a handful of status objects before the first TPV report,
    ///   so fewer than 5 rarely yields a fix.
    pub fn new(min_reads: u32) -> Self {
        Self { min_reads }
    }
}

#[async_trait]
impl PositionSource for GpsdPipe {
    async fn query(&mut self) -> PositionFix {
        let output = Command::new("gpspipe")
            .arg("-w")
            .arg("-n")
            .arg(self.min_reads.to_string())
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let text = String::from_utf8_lossy(&out.stdout);
                match first_fix(&text) {
                    Some((lat, lon)) => {
                        debug!("Position fix: {:.6}, {:.6}", lat, lon);
                        PositionFix::new(lat, lon)
                    }
                    None => {
                        warn!(
                            "No fix in {} gpsd reports, substituting sentinel",
                            self.min_reads
                        );
                        PositionFix::unavailable()
                    }
                }
            }
            Ok(out) => {
                warn!("gpspipe exited with {}, substituting sentinel", out.status);
                PositionFix::unavailable()
            }
            Err(e) => {
                warn!("Failed to run gpspipe: {}, substituting sentinel", e);
                PositionFix::unavailable()
            }
        }
    }
}

/// Scan gpsd JSON report lines for the first complete fix
///
/// Each line is an independent JSON object; lines that fail to parse or do
/// not carry both numeric `lat` and `lon` fields are skipped individually.
fn first_fix(output: &str) -> Option<(f64, f64)> {
    for line in output.lines() {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };

        let lat = value.get("lat").and_then(serde_json::Value::as_f64);
        let lon = value.get("lon").and_then(serde_json::Value::as_f64);

        if let (Some(lat), Some(lon)) = (lat, lon) {
            return Some((lat, lon));
        }
    }

    None
}
