// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Circular motion buffer.
//!
//! Fixed-capacity ring of [`MotionSegment`]s decoupling packet ingestion
//! from real-time execution. Single producer (the step-request service) and
//! single consumer (the segment loader, which runs in the timer interrupt
//! when the generator goes idle).
//!
//! The ring uses "increment, then access" indexing: `read` and `write` name
//! the slot that was *last* consumed/produced, so the buffer is empty when
//! they are equal, full when advancing `write` would collide with `read`,
//! and holds at most `CAP - 1` segments. On enqueue the slot is populated
//! in full before `write` advances; the index store is the publication
//! point the consumer keys off, and it must come last.

use crate::motion::segment::MotionSegment;

/// Enqueue rejected because the ring is full. The host sees this as status
/// code 0 in the step-request reply and retries; nothing is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferFull;

/// Outcome of asking the buffer for the next segment to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dequeue<const AXES: usize> {
    /// The read head advanced; here is a copy of the segment.
    Segment(MotionSegment<AXES>),
    /// Nothing buffered.
    Empty,
    /// The next segment is gated on a synchronisation packet. The read
    /// head did not move.
    AwaitingSync,
}

/// Fixed-capacity single-producer / single-consumer segment ring.
pub struct MotionBuffer<const AXES: usize, const CAP: usize> {
    slots: [MotionSegment<AXES>; CAP],
    /// Slot last read into the step generator.
    read: usize,
    /// Slot last written by the step-request service.
    write: usize,
    /// Slot up to which sync packets have already searched, so each sync
    /// releases exactly one not-yet-synchronised segment.
    sync_search: usize,
}

impl<const AXES: usize, const CAP: usize> MotionBuffer<AXES, CAP> {
    pub const fn new() -> Self {
        Self {
            slots: [MotionSegment::ZERO; CAP],
            read: 0,
            write: 0,
            sync_search: 0,
        }
    }

    #[inline]
    fn next_index(index: usize) -> usize {
        let index = index + 1;
        if index == CAP {
            0
        } else {
            index
        }
    }

    /// Segments currently buffered.
    pub fn len(&self) -> usize {
        (self.write + CAP - self.read) % CAP
    }

    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Index of the slot last read. Reported in the status reply so the
    /// host can size further enqueues.
    #[inline]
    pub fn read_position(&self) -> usize {
        self.read
    }

    /// Index of the slot last written.
    #[inline]
    pub fn write_position(&self) -> usize {
        self.write
    }

    /// Queue a segment behind everything already buffered.
    ///
    /// The slot contents are stored before the write index advances;
    /// consumers therefore never observe a half-written slot.
    pub fn enqueue(&mut self, segment: MotionSegment<AXES>) -> Result<(), BufferFull> {
        let next = Self::next_index(self.write);
        if next == self.read {
            return Err(BufferFull);
        }
        self.slots[next] = segment;
        self.write = next; // publication point
        Ok(())
    }

    /// Advance the read head and hand out the next segment, unless the ring
    /// is empty or the next segment is still waiting on a sync.
    ///
    /// On a successful advance the sync search marker is dragged along if
    /// it still pointed at the old read slot: a segment that has been
    /// loaded is past synchronisation by definition, and a later sync must
    /// not re-match it.
    pub fn try_next(&mut self) -> Dequeue<AXES> {
        if self.read == self.write {
            return Dequeue::Empty;
        }
        let next = Self::next_index(self.read);
        if self.slots[next].wait_for_sync {
            return Dequeue::AwaitingSync;
        }
        if self.sync_search == self.read {
            self.sync_search = next;
        }
        self.read = next;
        Dequeue::Segment(self.slots[next])
    }

    /// Release the oldest buffered segment still gated on synchronisation.
    ///
    /// Scans forward from the last search position, never past the write
    /// head. Returns whether a waiting segment was found and released; in
    /// either case the search position records how far the scan got, so
    /// each sync packet consumes at most one waiting segment and segments
    /// queued later need a fresh sync.
    pub fn release_next_waiting(&mut self) -> bool {
        let mut position = self.sync_search;
        loop {
            if position == self.write {
                self.sync_search = position;
                return false;
            }
            position = Self::next_index(position);
            if self.slots[position].wait_for_sync {
                self.slots[position].wait_for_sync = false;
                self.sync_search = position;
                return true;
            }
        }
    }
}

impl<const AXES: usize, const CAP: usize> Default for MotionBuffer<AXES, CAP> {
    fn default() -> Self {
        Self::new()
    }
}
