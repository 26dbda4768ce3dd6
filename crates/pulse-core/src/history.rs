//! Fixed-capacity inter-beat-interval history and the RMSSD metric.

/// Number of IBI slots retained for RMSSD.
pub const IBI_SLOTS: usize = 20;

/// Round-robin IBI store. Slots hold milliseconds; `0` means "no valid
/// value yet". The buffer never shrinks or compacts, the write index only
/// ever advances modulo [`IBI_SLOTS`].
#[derive(Debug, Clone)]
pub struct IbiHistory {
    slots: [u32; IBI_SLOTS],
    write_idx: usize,
}

impl IbiHistory {
    pub fn new() -> Self {
        Self {
            slots: [0; IBI_SLOTS],
            write_idx: 0,
        }
    }

    /// Overwrite the slot at the write index, then advance it. Callers are
    /// expected to have filtered `ibi_ms` for plausibility already.
    pub fn push(&mut self, ibi_ms: u32) {
        self.slots[self.write_idx] = ibi_ms;
        self.write_idx = (self.write_idx + 1) % IBI_SLOTS;
    }

    pub fn slots(&self) -> &[u32; IBI_SLOTS] {
        &self.slots
    }

    /// RMSSD over adjacent slot pairs, in storage order.
    ///
    /// The scan is one linear pass over the array, NOT a chronological walk
    /// of the ring: the pair that straddles the write index compares two
    /// intervals that are 20 beats apart in time. Kept that way on purpose
    /// for compatibility with the deployed firmware behavior.
    pub fn rmssd(&self) -> f32 {
        let mut sum_sq = 0.0f32;
        let mut pairs = 0u32;
        for i in 0..IBI_SLOTS - 1 {
            let a = self.slots[i];
            let b = self.slots[i + 1];
            if a != 0 && b != 0 {
                let d = b as f32 - a as f32;
                sum_sq += d * d;
                pairs += 1;
            }
        }
        if pairs == 0 {
            return 0.0;
        }
        (sum_sq / pairs as f32).sqrt()
    }

    /// Count of slots holding a measured interval.
    pub fn valid_count(&self) -> usize {
        self.slots.iter().filter(|&&s| s != 0).count()
    }
}

impl Default for IbiHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(values: &[u32]) -> IbiHistory {
        let mut h = IbiHistory::new();
        for &v in values {
            h.push(v);
        }
        h
    }

    #[test]
    fn test_single_value_has_no_pair() {
        assert_eq!(with(&[800]).rmssd(), 0.0);
    }

    #[test]
    fn test_two_adjacent_values() {
        // |850 - 800| = 50, one pair
        assert!((with(&[800, 850]).rmssd() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_three_values() {
        // diffs 50, 50 -> sqrt((2500 + 2500) / 2) = 50
        assert!((with(&[800, 850, 800]).rmssd() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(IbiHistory::new().rmssd(), 0.0);
    }

    #[test]
    fn test_wraparound_overwrites_oldest() {
        let mut h = IbiHistory::new();
        for i in 0..IBI_SLOTS as u32 + 3 {
            h.push(1000 + i);
        }
        // First three slots were overwritten by the newest values
        assert_eq!(h.slots()[0], 1000 + IBI_SLOTS as u32);
        assert_eq!(h.slots()[3], 1003);
        assert_eq!(h.valid_count(), IBI_SLOTS);
    }

    #[test]
    fn test_storage_order_scan_pairs_across_write_index() {
        // Fill the ring, then push one more so slot 0 holds the newest
        // interval while slot 1 holds the oldest. The (0, 1) pair is still
        // counted even though the two are not temporally adjacent.
        let mut h = IbiHistory::new();
        for _ in 0..IBI_SLOTS {
            h.push(800);
        }
        h.push(1400); // lands in slot 0
        let expected = {
            // one pair (1400, 800), eighteen pairs (800, 800)
            let sum = (1400.0f32 - 800.0).powi(2);
            (sum / 19.0).sqrt()
        };
        assert!((h.rmssd() - expected).abs() < 1e-3);
    }
}
