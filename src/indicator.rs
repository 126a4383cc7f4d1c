//! The "now" marker of the day view.
//!
//! Row geometry is never assumed. It is read back from whatever rendered the
//! hour rows through a [`LayoutProbe`], so the marker stays on the right line
//! however the rows are laid out.

use chrono::{DateTime, TimeZone, Timelike};

use crate::datetime::{hours_since_midnight, is_same_day};
use crate::view::{Mode, ViewState};

pub const HOUR_ROWS: usize = 24;

/// Access to the laid-out geometry of the hour rows.
pub trait LayoutProbe {
    /// Top offset of hour row `index`, `None` if that row is not laid out.
    fn row_top(&self, index: usize) -> Option<f64>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowGeometry {
    pub base: f64,
    pub row_height: f64,
}

impl RowGeometry {
    /// Derives geometry from the first two hour rows.
    pub fn measure<P: LayoutProbe + ?Sized>(probe: &P) -> Option<Self> {
        let first = probe.row_top(0)?;
        let second = probe.row_top(1)?;
        let row_height = second - first;

        if first.is_finite() && row_height.is_finite() && row_height > 0.0 {
            Some(RowGeometry {
                base: first,
                row_height,
            })
        } else {
            None
        }
    }

    pub fn offset_at<T: Timelike>(&self, time: &T) -> f64 {
        self.base + hours_since_midnight(time) * self.row_height
    }
}

/// Measured geometry plus the bookkeeping of when to measure again.
#[derive(Debug)]
pub struct TimeIndicator {
    geometry: Option<RowGeometry>,
    stale: bool,
}

impl Default for TimeIndicator {
    fn default() -> Self {
        TimeIndicator::new()
    }
}

impl TimeIndicator {
    pub fn new() -> Self {
        TimeIndicator {
            geometry: None,
            stale: true,
        }
    }

    pub fn geometry(&self) -> Option<RowGeometry> {
        self.geometry
    }

    /// True until a measurement succeeded, and again after a resize.
    pub fn needs_measure(&self) -> bool {
        self.stale
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// The hour rows went away. Keeps nothing from the old layout.
    pub fn unmount(&mut self) {
        self.geometry = None;
        self.stale = true;
    }

    pub fn measure<P: LayoutProbe + ?Sized>(&mut self, probe: &P) -> Option<RowGeometry> {
        self.geometry = RowGeometry::measure(probe);
        self.stale = self.geometry.is_none();
        if self.stale {
            log::debug!("Hour rows not measurable yet, hiding time indicator");
        }
        self.geometry
    }

    /// Marker offset, only while `view` shows today in day mode.
    pub fn offset<Tz: TimeZone>(&self, view: &ViewState, now: &DateTime<Tz>) -> Option<f64> {
        if view.mode() != Mode::Day || !is_same_day(&view.selected(), now) {
            return None;
        }

        self.geometry.map(|geometry| geometry.offset_at(now))
    }
}
