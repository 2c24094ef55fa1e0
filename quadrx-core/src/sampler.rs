//! Receive sampler
//!
//! A fixed array of single-byte atomic cells shared between interrupt
//! handlers and the main loop. Each cell has exactly one writer: the sampler
//! hands out a [`SlotWriter`] for a given index at most once. The main loop
//! gets a [`SampleReader`], which can only load.
//!
//! There is no queueing. A handler storing a new byte overwrites whatever the
//! loop has not yet rendered, so the loop always sees the most recent byte
//! per channel. Cells are one byte wide so that stores are single,
//! naturally atomic bus writes on the target.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

/// Maximum number of slots a sampler can hold (one claim bit per slot)
pub const MAX_SLOTS: usize = 32;

/// Sampler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerError {
    /// Slot index is not below the sampler size
    IndexOutOfRange,
    /// Write capability for this slot was already handed out
    AlreadyClaimed,
}

/// Fixed-size array of receive slots
pub struct ReceiveSampler<const N: usize> {
    slots: [AtomicU8; N],
    claimed: AtomicU32,
}

impl<const N: usize> Default for ReceiveSampler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReceiveSampler<N> {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY: AtomicU8 = AtomicU8::new(0);

    /// Create a sampler with every slot at zero
    ///
    /// Usable in a `static` initializer.
    pub const fn new() -> Self {
        assert!(N <= MAX_SLOTS, "too many sampler slots");
        Self {
            slots: [Self::EMPTY; N],
            claimed: AtomicU32::new(0),
        }
    }

    /// Number of slots
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the sampler has no slots
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Claim write capability for one slot
    ///
    /// Succeeds once per index for the lifetime of the sampler.
    pub fn writer(&self, index: usize) -> Result<SlotWriter<'_>, SamplerError> {
        if index >= N {
            return Err(SamplerError::IndexOutOfRange);
        }

        let bit = 1u32 << index;
        let previous = self.claimed.fetch_or(bit, Ordering::AcqRel);
        if previous & bit != 0 {
            return Err(SamplerError::AlreadyClaimed);
        }

        Ok(SlotWriter {
            cell: &self.slots[index],
            index,
        })
    }

    /// Read-only view of every slot
    pub fn reader(&self) -> SampleReader<'_, N> {
        SampleReader { slots: &self.slots }
    }
}

/// Write capability for exactly one slot
///
/// Deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct SlotWriter<'a> {
    cell: &'a AtomicU8,
    index: usize,
}

impl SlotWriter<'_> {
    /// Store a byte, replacing the previous value
    #[inline]
    pub fn store(&self, byte: u8) {
        self.cell.store(byte, Ordering::Relaxed);
    }

    /// Slot index this writer owns
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Read-only view of a sampler
#[derive(Clone, Copy)]
pub struct SampleReader<'a, const N: usize> {
    slots: &'a [AtomicU8; N],
}

impl<const N: usize> SampleReader<'_, N> {
    /// Current value of one slot
    pub fn get(&self, index: usize) -> Option<u8> {
        self.slots.get(index).map(|cell| cell.load(Ordering::Relaxed))
    }

    /// Copy of every slot
    ///
    /// Slots are loaded one at a time; a handler may update a slot that was
    /// already copied.
    pub fn snapshot(&self) -> [u8; N] {
        core::array::from_fn(|i| self.slots[i].load(Ordering::Relaxed))
    }

    /// Iterate `(index, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, cell)| (i, cell.load(Ordering::Relaxed)))
    }

    /// Number of slots
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the view has no slots
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_sampler_reads_zero() {
        let sampler: ReceiveSampler<4> = ReceiveSampler::new();
        assert_eq!(sampler.len(), 4);
        assert_eq!(sampler.reader().snapshot(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_static_sampler() {
        static SAMPLER: ReceiveSampler<4> = ReceiveSampler::new();
        let writer = SAMPLER.writer(3).unwrap();
        writer.store(0x7E);
        assert_eq!(SAMPLER.reader().get(3), Some(0x7E));
    }

    #[test]
    fn test_writer_claimed_once() {
        let sampler: ReceiveSampler<4> = ReceiveSampler::new();
        let first = sampler.writer(1);
        assert!(first.is_ok());
        assert_eq!(sampler.writer(1).unwrap_err(), SamplerError::AlreadyClaimed);

        // Other slots are independent
        assert!(sampler.writer(0).is_ok());
    }

    #[test]
    fn test_writer_out_of_range() {
        let sampler: ReceiveSampler<4> = ReceiveSampler::new();
        assert_eq!(sampler.writer(4).unwrap_err(), SamplerError::IndexOutOfRange);
    }

    #[test]
    fn test_writer_only_touches_own_slot() {
        let sampler: ReceiveSampler<4> = ReceiveSampler::new();
        let writer = sampler.writer(2).unwrap();
        assert_eq!(writer.index(), 2);

        writer.store(0x41);
        assert_eq!(sampler.reader().snapshot(), [0, 0, 0x41, 0]);
    }

    #[test]
    fn test_reader_get_and_iter() {
        let sampler: ReceiveSampler<2> = ReceiveSampler::new();
        sampler.writer(0).unwrap().store(10);
        sampler.writer(1).unwrap().store(20);

        let reader = sampler.reader();
        assert_eq!(reader.get(0), Some(10));
        assert_eq!(reader.get(2), None);

        let pairs: heapless::Vec<(usize, u8), 2> = reader.iter().collect();
        assert_eq!(pairs.as_slice(), &[(0, 10), (1, 20)]);
    }

    proptest! {
        #[test]
        fn prop_last_value_wins(
            bytes in proptest::collection::vec(any::<u8>(), 1..64),
            slot in 0usize..4,
        ) {
            let sampler: ReceiveSampler<4> = ReceiveSampler::new();
            let writer = sampler.writer(slot).unwrap();
            for &b in &bytes {
                writer.store(b);
            }
            prop_assert_eq!(sampler.reader().get(slot), bytes.last().copied());
        }
    }
}
