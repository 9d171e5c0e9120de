//! Bit permutation inside a single field window.
//!
//! A [Reorder] gathers runs of bits from the window as read off the wire and
//! scatters them to new positions. Offsets are relative to the window, with 0
//! being its first (most significant) bit.

use crate::errors::ProgramError;

/// Moves `count` bits found at `source_start` to `dest_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRange {
    pub source_start: usize,
    pub count: usize,
    pub dest_start: usize,
}

impl ReorderRange {
    pub fn new(source_start: usize, count: usize, dest_start: usize) -> Self {
        ReorderRange {
            source_start,
            count,
            dest_start,
        }
    }
}

/// Validated set of ranges for a window of `width` bits, sorted by destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    width: usize,
    ranges: Vec<ReorderRange>,
}

impl Reorder {
    /// Checks that the destinations of `ranges` tile `[0, width)` with no gap or
    /// overlap and that every source run lies inside the window.
    ///
    /// Sources may overlap; the same input bit can feed several outputs.
    pub fn new(width: usize, ranges: &[ReorderRange]) -> Result<Self, ProgramError> {
        if width == 0 || width > 64 {
            return Err(ProgramError::InvalidReorderSpec(format!(
                "window of {width} bits cannot be reordered"
            )));
        }

        if ranges.is_empty() {
            return Err(ProgramError::InvalidReorderSpec(
                "no ranges given".to_string(),
            ));
        }

        let mut sorted = ranges.to_vec();
        // stable: equal destinations keep caller order
        sorted.sort_by_key(|r| r.dest_start);

        let mut next = 0;
        for range in &sorted {
            if range.count == 0 {
                return Err(ProgramError::InvalidReorderSpec(format!(
                    "range at source {} has zero count",
                    range.source_start
                )));
            }

            if range
                .source_start
                .checked_add(range.count)
                .map_or(true, |end| end > width)
            {
                return Err(ProgramError::InvalidReorderSpec(format!(
                    "source {}..{} exceeds {width}-bit window",
                    range.source_start,
                    range.source_start.saturating_add(range.count)
                )));
            }

            if range.dest_start != next {
                let problem = if range.dest_start < next {
                    "overlaps"
                } else {
                    "leaves a gap before"
                };
                return Err(ProgramError::InvalidReorderSpec(format!(
                    "destination {} {problem} bit {next}",
                    range.dest_start
                )));
            }

            next += range.count;
        }

        if next != width {
            return Err(ProgramError::InvalidReorderSpec(format!(
                "destinations cover {next} of {width} bits"
            )));
        }

        Ok(Reorder {
            width,
            ranges: sorted,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Ranges in destination order.
    pub fn ranges(&self) -> &[ReorderRange] {
        &self.ranges
    }

    /// Permutes the low `width` bits of `window`.
    pub fn apply(&self, window: u64) -> u64 {
        self.ranges.iter().fold(0u64, |out, range| {
            let part = (window >> (self.width - range.source_start - range.count))
                & mask(range.count);
            out | (part << (self.width - range.dest_start - range.count))
        })
    }
}

fn mask(n: usize) -> u64 {
    if n >= 64 { u64::MAX } else { (1u64 << n) - 1 }
}
