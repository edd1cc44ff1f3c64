//! Classification of hypocenter depths into colored buckets.

use serde::{Deserialize, Serialize};

use crate::error::QuakeMapError;
use crate::Color;

/// A depth interval drawn with one color.
///
/// Bounds are compared with strict `>`, so a bucket covers `(lower_km, upper_km]`: a depth lying
/// exactly on a boundary belongs to the shallower bucket. The lowest bucket of a [`DepthScale`] is
/// also unbounded below; its `lower_km` is only used for legend labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthBucket {
    /// Lower bound in kilometers.
    pub lower_km: f64,
    /// Upper bound in kilometers. `None` for the open-ended deepest bucket.
    pub upper_km: Option<f64>,
    /// Fill color for markers in this bucket.
    pub color: Color,
}

impl DepthBucket {
    /// Creates a closed bucket.
    pub const fn closed(lower_km: f64, upper_km: f64, color: Color) -> Self {
        Self {
            lower_km,
            upper_km: Some(upper_km),
            color,
        }
    }

    /// Creates an open-ended bucket covering everything deeper than `lower_km`.
    pub const fn open(lower_km: f64, color: Color) -> Self {
        Self {
            lower_km,
            upper_km: None,
            color,
        }
    }

    /// Depth that is guaranteed to be classified into this bucket when it is not the lowest one.
    pub fn representative_depth(&self) -> f64 {
        match self.upper_km {
            Some(upper) => (self.lower_km + upper) / 2.0,
            None => self.lower_km + 1.0,
        }
    }
}

/// Default buckets: light pink for shallow events down to dark purple beyond 90 km.
pub const DEFAULT_BUCKETS: [DepthBucket; 6] = [
    DepthBucket::closed(-10.0, 10.0, Color::from_hex("#FF66CC")),
    DepthBucket::closed(10.0, 30.0, Color::from_hex("#FF3399")),
    DepthBucket::closed(30.0, 50.0, Color::from_hex("#CC00FF")),
    DepthBucket::closed(50.0, 70.0, Color::from_hex("#9900CC")),
    DepthBucket::closed(70.0, 90.0, Color::from_hex("#663399")),
    DepthBucket::open(90.0, Color::from_hex("#330066")),
];

/// Ordered set of contiguous depth buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthScale {
    buckets: Vec<DepthBucket>,
}

impl Default for DepthScale {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS.to_vec(),
        }
    }
}

impl DepthScale {
    /// Creates a scale from buckets sorted by ascending lower bound.
    ///
    /// The buckets must be contiguous, only the last one may be open-ended (and it must be), and
    /// every bucket must have its own color so that a color identifies its bucket.
    pub fn new(buckets: Vec<DepthBucket>) -> Result<Self, QuakeMapError> {
        let Some(last) = buckets.last() else {
            return Err(QuakeMapError::Config(
                "depth scale must have at least one bucket".into(),
            ));
        };

        if last.upper_km.is_some() {
            return Err(QuakeMapError::Config(
                "deepest bucket must be open-ended".into(),
            ));
        }

        for bucket in &buckets {
            if !bucket.lower_km.is_finite() || bucket.upper_km.is_some_and(|v| !v.is_finite()) {
                return Err(QuakeMapError::Config(format!(
                    "bucket starting at {} has non-finite bounds",
                    bucket.lower_km
                )));
            }

            if bucket.upper_km.is_some_and(|upper| upper <= bucket.lower_km) {
                return Err(QuakeMapError::Config(format!(
                    "bucket starting at {} is empty",
                    bucket.lower_km
                )));
            }
        }

        for pair in buckets.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            match lower.upper_km {
                None => {
                    return Err(QuakeMapError::Config(format!(
                        "bucket starting at {} is open-ended but is not the deepest",
                        lower.lower_km
                    )))
                }
                Some(bound) if bound != upper.lower_km => {
                    return Err(QuakeMapError::Config(format!(
                        "buckets are not contiguous: {} - {} is followed by a bucket starting at {}",
                        lower.lower_km, bound, upper.lower_km
                    )))
                }
                Some(_) => {}
            }
        }

        for (index, bucket) in buckets.iter().enumerate() {
            if buckets[..index].iter().any(|b| b.color == bucket.color) {
                return Err(QuakeMapError::Config(format!(
                    "color {} is used by more than one bucket",
                    bucket.color
                )));
            }
        }

        Ok(Self { buckets })
    }

    /// Buckets in ascending order.
    pub fn buckets(&self) -> &[DepthBucket] {
        &self.buckets
    }

    /// Returns the bucket the depth falls into.
    ///
    /// Thresholds are checked from the deepest bucket up. Depths above the lowest threshold,
    /// including negative ones and NaN, get the lowest bucket.
    pub fn classify(&self, depth_km: f64) -> &DepthBucket {
        let lowest = &self.buckets[0];
        self.buckets
            .iter()
            .skip(1)
            .rev()
            .find(|bucket| depth_km > bucket.lower_km)
            .unwrap_or(lowest)
    }

    /// Returns the fill color for the depth.
    pub fn color(&self, depth_km: f64) -> Color {
        self.classify(depth_km).color
    }
}
