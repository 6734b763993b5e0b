//! Swap-rate accumulator (§4.G): 1-minute and 5-minute sliding windows of
//! objects swapped out, anchored on the same virtual clock the scheduler
//! advances. Lives here only because it shares `expire`'s per-second walk;
//! it has no other coupling to the timer store.

use arrayvec::ArrayVec;

const WINDOW: usize = 60;

pub(crate) struct SwapRate {
    /// Per-second counters for the last 60 seconds.
    swapped1: ArrayVec<u32, WINDOW>,
    /// Per-5-second-bucket counters for the last 5 minutes.
    swapped5: ArrayVec<u32, WINDOW>,
    rate1: u64,
    rate5: u64,
    pub swaptime: u32,
}

impl SwapRate {
    pub fn new(now: u32) -> Self {
        Self {
            swapped1: core::iter::repeat(0).take(WINDOW).collect(),
            swapped5: core::iter::repeat(0).take(WINDOW).collect(),
            rate1: 0,
            rate5: 0,
            swaptime: now,
        }
    }

    /// §4.G `swapcount`: record `n` more swaps in both windows' current
    /// slot. Does not itself invalidate the clock cache -- the scheduler
    /// front-end does that, since only it knows about the `VirtualClock`.
    pub fn add(&mut self, n: u32) {
        self.rate1 += n as u64;
        self.rate5 += n as u64;
        let i1 = (self.swaptime as usize) % WINDOW;
        self.swapped1[i1] += n;
        let i5 = ((self.swaptime as usize) % (WINDOW * 5)) / 5;
        self.swapped5[i5] += n;
    }

    /// Jump `swaptime` straight to `now` with no eviction. Used once, to
    /// anchor the accumulator to wall time on the first `expire` instead of
    /// walking `advance` one second at a time from whatever `new` was given.
    pub fn anchor(&mut self, now: u32) {
        self.swaptime = now;
    }

    /// Walk `swaptime` forward to `now`, evicting one ring slot per second
    /// (and one 5-second bucket every fifth second) from the running sums.
    pub fn advance(&mut self, now: u32) {
        while self.swaptime < now {
            self.swaptime += 1;
            let i1 = (self.swaptime as usize) % WINDOW;
            self.rate1 -= self.swapped1[i1] as u64;
            self.swapped1[i1] = 0;
            if self.swaptime % 5 == 0 {
                let i5 = ((self.swaptime as usize) % (WINDOW * 5)) / 5;
                self.rate5 -= self.swapped5[i5] as u64;
                self.swapped5[i5] = 0;
            }
        }
    }

    pub fn rate1(&self) -> u64 {
        self.rate1
    }
    pub fn rate5(&self) -> u64 {
        self.rate5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_evicts() {
        let mut s = SwapRate::new(0);
        s.add(3);
        s.add(2);
        assert_eq!(s.rate1(), 5);
        assert_eq!(s.rate5(), 5);

        // advancing 60s should evict the bucket holding our counts
        s.advance(60);
        assert_eq!(s.rate1(), 0);
    }

    #[test]
    fn five_minute_window_survives_one_minute_advance() {
        let mut s = SwapRate::new(0);
        s.add(10);
        s.advance(59);
        // 1-minute window still holds it (hasn't wrapped the ring yet)
        assert_eq!(s.rate1(), 10);
        assert_eq!(s.rate5(), 10);
    }
}
