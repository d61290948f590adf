use std::fmt;

// ---------------------------------------------------------------------------
// DepthInterval – half-open depth range [top, bottom)
// ---------------------------------------------------------------------------

/// A half-open depth range `[top, bottom)`.
///
/// Boundary rule: two non-degenerate intervals overlap only when they share
/// a strictly positive length, so touching intervals (`a.bottom == b.top`)
/// do not overlap. A degenerate interval (`top == bottom`) is a point; it
/// overlaps only another point at the same depth, never an interval with
/// positive length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthInterval {
    pub top: f64,
    pub bottom: f64,
}

impl DepthInterval {
    pub fn new(top: f64, bottom: f64) -> Self {
        DepthInterval { top, bottom }
    }

    pub fn length(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_degenerate(&self) -> bool {
        self.top == self.bottom
    }

    pub fn overlaps(&self, other: &DepthInterval) -> bool {
        match (self.is_degenerate(), other.is_degenerate()) {
            (true, true) => self.top == other.top,
            (true, false) | (false, true) => false,
            (false, false) => self.top.max(other.top) < self.bottom.min(other.bottom),
        }
    }

    /// `None` when the intervals do not overlap, else
    /// `(max(tops), min(bottoms))`.
    pub fn intersect(&self, other: &DepthInterval) -> Option<DepthInterval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(DepthInterval {
            top: self.top.max(other.top),
            bottom: self.bottom.min(other.bottom),
        })
    }

    /// Whether `depth` falls in `[top, bottom)`.
    pub fn contains(&self, depth: f64) -> bool {
        self.top <= depth && depth < self.bottom
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn encloses(&self, other: &DepthInterval) -> bool {
        self.top <= other.top && other.bottom <= self.bottom
    }

    /// Smallest interval covering both.
    pub fn hull(&self, other: &DepthInterval) -> DepthInterval {
        DepthInterval {
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl fmt::Display for DepthInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.top, self.bottom)
    }
}
