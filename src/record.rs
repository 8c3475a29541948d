//! # Fused Record
//!
//! One telemetry frame combined with the position fix and heading sampled
//! at the same instant, plus its text-line serialization.

use chrono::{DateTime, Local};

use crate::link::frame::TelemetryFrame;
use crate::location::PositionFix;

/// Placeholder written when the heading could not be sampled this cycle
const HEADING_ABSENT: &str = "NaN";

/// Placeholder written when no cardinal direction could be derived
const CARDINAL_ABSENT: &str = "NA";

/// One fused acquisition cycle, immutable after creation
#[derive(Debug, Clone, PartialEq)]
pub struct FusedRecord {
    /// Wall-clock time at which the frame was fused
    pub timestamp: DateTime<Local>,
    pub fix: PositionFix,
    /// Geographic heading in [0, 360); absent if the orientation read failed
    pub heading: Option<f64>,
    /// Cardinal label derived from the heading
    pub cardinal: Option<&'static str>,
    pub frame: TelemetryFrame,
}

impl FusedRecord {
    /// Fuse a received frame with the sensor samples taken for it
    pub fn new(
        fix: PositionFix,
        heading: Option<f64>,
        cardinal: Option<&'static str>,
        frame: TelemetryFrame,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            fix,
            heading,
            cardinal,
            frame,
        }
    }

    /// Serialize the record as one log line
    ///
    /// Format: `DD-MM-YYYY HH:MM:SS lat lon heading cardinal irradiance
    /// temperature temp_deviation`, space-separated. Coordinates carry six
    /// decimal places, the remaining values two.
    pub fn format_line(&self) -> String {
        let heading = self
            .heading
            .map_or_else(|| HEADING_ABSENT.to_string(), |h| format!("{:.2}", h));
        let cardinal = self.cardinal.unwrap_or(CARDINAL_ABSENT);

        format!(
            "{} {:.6} {:.6} {} {} {:.2} {:.2} {:.2}",
            self.timestamp.format("%d-%m-%Y %H:%M:%S"),
            self.fix.lat,
            self.fix.lon,
            heading,
            cardinal,
            self.frame.irradiance,
            self.frame.temperature,
            self.frame.temp_deviation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_frame() -> TelemetryFrame {
        TelemetryFrame {
            irradiance: 500.25,
            temperature: 23.10,
            temp_deviation: 0.50,
        }
    }

    fn fixed_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 5, 2, 14, 30, 5).unwrap()
    }

    #[test]
    fn test_format_line_with_sentinel_fix() {
        let record = FusedRecord {
            timestamp: fixed_timestamp(),
            fix: PositionFix::unavailable(),
            heading: Some(45.0),
            cardinal: Some("NE"),
            frame: sample_frame(),
        };

        assert_eq!(
            record.format_line(),
            "02-05-2023 14:30:05 0.000000 0.000000 45.00 NE 500.25 23.10 0.50"
        );
    }

    #[test]
    fn test_format_line_with_valid_fix() {
        let record = FusedRecord {
            timestamp: fixed_timestamp(),
            fix: PositionFix::new(40.416775, -3.703790),
            heading: Some(181.236),
            cardinal: Some("S"),
            frame: sample_frame(),
        };

        assert_eq!(
            record.format_line(),
            "02-05-2023 14:30:05 40.416775 -3.703790 181.24 S 500.25 23.10 0.50"
        );
    }

    #[test]
    fn test_format_line_with_absent_heading() {
        let record = FusedRecord {
            timestamp: fixed_timestamp(),
            fix: PositionFix::new(40.416775, -3.703790),
            heading: None,
            cardinal: None,
            frame: sample_frame(),
        };

        assert_eq!(
            record.format_line(),
            "02-05-2023 14:30:05 40.416775 -3.703790 NaN NA 500.25 23.10 0.50"
        );
    }

    #[test]
    fn test_zero_heading_is_not_absent() {
        // 0 degrees is a valid bearing and must serialize as a number
        let record = FusedRecord {
            timestamp: fixed_timestamp(),
            fix: PositionFix::unavailable(),
            heading: Some(0.0),
            cardinal: Some("N"),
            frame: sample_frame(),
        };

        let line = record.format_line();
        assert!(line.contains(" 0.00 N "), "line was: {}", line);
    }

    #[test]
    fn test_new_uses_current_time() {
        let before = Local::now();
        let record = FusedRecord::new(PositionFix::unavailable(), None, None, sample_frame());
        let after = Local::now();

        assert!(record.timestamp >= before && record.timestamp <= after);
    }
}
