// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motion segment record.

/// Travel direction of an axis, as driven onto its direction pin and
/// applied to the position ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Signed position increment per emitted step.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// One queued move: per-axis targets plus an execution duration.
///
/// `target` is in internal microsteps once the segment has been enqueued;
/// the step-request service shifts host quarter-steps left by
/// [`crate::config::SMOOTHING_BITS`] at decode time. Whether `target` is a
/// step delta or an absolute destination is decided by `absolute` and
/// resolved against the position ledger when the segment is *loaded*, not
/// when it is enqueued, so absolute moves land where the host planned even
/// after prior segments have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSegment<const AXES: usize> {
    /// Per-axis step delta or absolute destination, internal microsteps.
    pub target: [i32; AXES],
    /// Execution time in step-generator ticks. 24-bit range on the wire.
    pub duration: u32,
    /// Rolling identifier chosen by the host; opaque here, echoed in the
    /// status reply so the host can tell which segment is executing.
    pub key: u8,
    /// `target` is an absolute destination rather than a delta.
    pub absolute: bool,
    /// Hold this segment until a synchronisation packet releases it.
    pub wait_for_sync: bool,
}

impl<const AXES: usize> MotionSegment<AXES> {
    /// The empty segment used to initialise buffer slots.
    pub const ZERO: Self = Self {
        target: [0; AXES],
        duration: 0,
        key: 0,
        absolute: false,
        wait_for_sync: false,
    };
}

impl<const AXES: usize> Default for MotionSegment<AXES> {
    fn default() -> Self {
        Self::ZERO
    }
}
