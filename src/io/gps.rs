//! GPS track loading and timestamp lookup.
//!
//! When a recording session carries a GPS log, geocoded detections can be
//! tagged with the fix nearest their frame's timestamp. Tracks load from
//! CSV with `time_s,lat,lon,speed_mps,heading_deg` columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsSample {
    /// Seconds since the start of the recording
    pub time_s: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Ground speed in meters per second
    pub speed_mps: f64,
    /// Heading in degrees clockwise from north
    pub heading_deg: f64,
}

/// A time-ordered sequence of GPS fixes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsTrack {
    samples: Vec<GpsSample>,
}

impl GpsTrack {
    /// Build a track, sorting the samples by time.
    pub fn from_samples(mut samples: Vec<GpsSample>) -> Self {
        samples.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
        Self { samples }
    }

    /// Read a track from CSV with a
    /// `time_s,lat,lon,speed_mps,heading_deg` header.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut samples = Vec::new();
        for row in csv_reader.deserialize() {
            samples.push(row?);
        }
        Ok(Self::from_samples(samples))
    }

    /// Load a track from a CSV file.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv(File::open(path)?)
    }

    /// The fix nearest in time to `time_s`.
    ///
    /// Times outside the track clamp to the first or last fix. When a time
    /// is equidistant from two fixes, the earlier one wins.
    pub fn nearest(&self, time_s: f64) -> Option<&GpsSample> {
        if self.samples.is_empty() {
            return None;
        }
        let idx = self.samples.partition_point(|s| s.time_s < time_s);
        if idx == 0 {
            return self.samples.first();
        }
        if idx == self.samples.len() {
            return self.samples.last();
        }
        let before = &self.samples[idx - 1];
        let after = &self.samples[idx];
        if time_s - before.time_s <= after.time_s - time_s {
            Some(before)
        } else {
            Some(after)
        }
    }

    /// Number of fixes in the track.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the track holds no fixes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All fixes in time order.
    pub fn samples(&self) -> &[GpsSample] {
        &self.samples
    }
}
