//! Scheduler front-end (§4.F): the public API tying the arena, heap, wheel,
//! immediate/running lists, virtual clock, and swap-rate accumulator into
//! the operations the host actually calls.

use crate::arena::{CalloutArena, NIL};
use crate::clock::{Deadline, RawClock, VirtualClock};
use crate::error::fatal;
use crate::executor::{Executor, ObjectStore};
use crate::heap;
use crate::snapshot::{self, Swapper};
use crate::swaprate::SwapRate;
use crate::wheel::Wheel;
use crate::{SchedulerError, NO_MILLIS, WHEEL_SIZE};

/// Which timer store a `check`ed callout belongs in; the host must pass the
/// same value back to `create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Immediate,
    Wheel,
    Heap,
}

/// Owning scheduler state. One instance per host process -- see the design
/// notes on why this is a struct rather than free functions over statics.
pub struct Scheduler {
    arena: CalloutArena,
    wheel: Wheel,
    clock: VirtualClock,
    swaprate: SwapRate,
    immediate: u32,
    running: u32,
    /// Count of entries across wheel + immediate + running (§3 invariant 5).
    nshort: u32,
    /// Least non-zero deadline in the wheel, 0 if none (§3 invariant 6).
    timeout: u32,
    /// Set once `swaprate` has been anchored to wall time by the first
    /// `expire` call; `new` has no clock to anchor with up front.
    swaprate_anchored: bool,
}

impl Scheduler {
    /// `init(max)`: `max == 0` disables the subsystem -- every subsequent
    /// operation on it is a no-op (§6).
    pub fn new(max: u32) -> Self {
        Self {
            arena: CalloutArena::new(max),
            wheel: Wheel::new(),
            clock: VirtualClock::new(),
            swaprate: SwapRate::new(0),
            immediate: NIL,
            running: NIL,
            nshort: 0,
            timeout: 0,
            swaprate_anchored: false,
        }
    }

    fn disabled(&self) -> bool {
        self.arena.capacity == 0
    }

    fn has_running(&self) -> bool {
        self.running != NIL
    }

    fn list_count(&self, head: u32) -> u32 {
        if head == NIL {
            0
        } else {
            self.arena.get(head).count
        }
    }

    fn now(&mut self, clock: &dyn RawClock) -> (u32, u16) {
        let has_running = self.has_running();
        self.clock.now(clock, has_running, self.timeout)
    }

    fn compute_deadline(&mut self, clock: &dyn RawClock, delay_s: u32, delay_ms: u16) -> Result<Deadline, SchedulerError> {
        let (now_s, now_m) = self.now(clock);
        if delay_ms == NO_MILLIS {
            let s = now_s.checked_add(delay_s).ok_or(SchedulerError::TooLongDelay)?;
            return Ok(Deadline::new(s, NO_MILLIS));
        }
        let total_ms = now_m as u32 + delay_ms as u32;
        let extra_s = total_ms / 1000;
        let m = (total_ms % 1000) as u16;
        let s = now_s
            .checked_add(delay_s)
            .and_then(|s| s.checked_add(extra_s))
            .ok_or(SchedulerError::TooLongDelay)?;
        Ok(Deadline::new(s, m))
    }

    fn classify(&self, deadline: Deadline, zero_delay: bool) -> Bucket {
        if zero_delay {
            return Bucket::Immediate;
        }
        if deadline.millis == NO_MILLIS
            && deadline.seconds > self.clock.timestamp
            && deadline.seconds < self.clock.timestamp + WHEEL_SIZE as u32
        {
            Bucket::Wheel
        } else {
            Bucket::Heap
        }
    }

    /// §4.F `check`: pre-reserve room for `n` forthcoming `create`s and
    /// classify the bucket the caller should pass back in.
    pub fn check(
        &mut self,
        clock: &dyn RawClock,
        n: u32,
        delay_s: u32,
        delay_ms: u16,
    ) -> Result<(Deadline, Bucket), SchedulerError> {
        if self.disabled() {
            return Ok((Deadline::NONE, Bucket::Immediate));
        }
        if self.arena.would_overflow(n) {
            return Err(SchedulerError::TooManyCallouts);
        }
        let zero_delay = delay_s == 0 && (delay_ms == 0 || delay_ms == NO_MILLIS);
        let deadline = self.compute_deadline(clock, delay_s, delay_ms)?;
        let bucket = self.classify(deadline, zero_delay);
        Ok((deadline, bucket))
    }

    /// §4.F `create`: commit a record into the bucket a prior `check`
    /// returned. Must not be called without a preceding successful `check`.
    pub fn create(&mut self, oindex: u32, handle: u32, deadline: Deadline, bucket: Bucket) {
        if self.disabled() {
            return;
        }
        match bucket {
            Bucket::Immediate => {
                let idx = self.arena.alloc_wheel_slot();
                let r = self.arena.get_mut(idx);
                r.handle = handle;
                r.oindex = oindex;
                r.time = 0;
                r.mtime = NO_MILLIS;
                self.arena.list_append(&mut self.immediate, idx);
                self.nshort += 1;
            }
            Bucket::Wheel => {
                let idx = self.arena.alloc_wheel_slot();
                {
                    let r = self.arena.get_mut(idx);
                    r.handle = handle;
                    r.oindex = oindex;
                    r.time = deadline.seconds;
                    r.mtime = deadline.millis;
                }
                self.wheel.insert(&mut self.arena, deadline.seconds, idx);
                self.nshort += 1;
                if self.timeout == 0 || deadline.seconds < self.timeout {
                    self.timeout = deadline.seconds;
                }
            }
            Bucket::Heap => {
                // A whole-second deadline heaps at millis 0, not NO_MILLIS --
                // 0 sorts before any sub-second entry in the same second and
                // matches the `(time, mtime) <= (t_wall, m_wall)` drain test
                // in `expire`, which a stored NO_MILLIS (0xFFFF) would miss
                // for a whole extra second.
                let m = if deadline.millis == NO_MILLIS { 0 } else { deadline.millis };
                let idx = heap::enqueue(&mut self.arena, deadline.seconds, m);
                let r = self.arena.get_mut(idx);
                r.handle = handle;
                r.oindex = oindex;
            }
        }
    }

    fn remove_from_list(&mut self, head_is_immediate: bool, oindex: u32, handle: u32) -> bool {
        let mut head = if head_is_immediate { self.immediate } else { self.running };
        let mut prev = NIL;
        let mut cur = head;
        let mut found = false;
        while cur != NIL {
            let rec = *self.arena.get(cur);
            if rec.oindex == oindex && rec.handle == handle {
                self.arena.list_unlink(&mut head, prev, cur);
                self.arena.free(cur);
                found = true;
                break;
            }
            prev = cur;
            cur = rec.next;
        }
        if head_is_immediate {
            self.immediate = head;
        } else {
            self.running = head;
        }
        found
    }

    /// §4.F `del`: remove the unique callout matching `(oindex, handle)`.
    /// Absence is a fatal invariant violation -- the caller is trusted to
    /// hold a live handle.
    pub fn del(&mut self, oindex: u32, handle: u32, deadline: Deadline) {
        if self.disabled() {
            return;
        }

        let in_wheel_horizon = deadline.millis == NO_MILLIS
            && deadline.seconds > self.clock.timestamp
            && deadline.seconds < self.clock.timestamp + WHEEL_SIZE as u32;
        if in_wheel_horizon && self.wheel.remove(&mut self.arena, deadline.seconds, oindex, handle) {
            self.nshort -= 1;
            // the removed entry may have been the `timeout` witness -- rescan
            // rather than leave `timeout` naming an emptied slot.
            self.recompute_timeout();
            return;
        }

        let already_passed = deadline.seconds <= self.clock.timestamp;
        if already_passed {
            if self.remove_from_list(true, oindex, handle) {
                self.nshort -= 1;
                return;
            }
            if self.remove_from_list(false, oindex, handle) {
                self.nshort -= 1;
                return;
            }
        }

        for i in 1..=self.arena.queue_brk {
            let rec = *self.arena.get(i);
            if rec.oindex == oindex && rec.handle == handle {
                heap::dequeue(&mut self.arena, i);
                return;
            }
        }

        fatal!("del: no callout matching (oindex={}, handle={})", oindex, handle);
    }

    /// §4.F `remaining`: adjusted `now()` subtracted from `(deadline, millis)`
    /// with millisecond borrow. `(0, NO_MILLIS)` for expired or zero entries.
    pub fn remaining(&mut self, clock: &dyn RawClock, deadline: Deadline) -> Deadline {
        if deadline.seconds == 0 {
            return Deadline::new(0, NO_MILLIS);
        }
        let (now_s, now_m) = self.now(clock);

        // No sub-second component on the deadline: compare at whole-second
        // granularity and echo the sentinel back rather than manufacturing
        // a millisecond figure the caller never asked for.
        if deadline.millis == NO_MILLIS {
            return if deadline.seconds <= now_s {
                Deadline::new(0, NO_MILLIS)
            } else {
                Deadline::new(deadline.seconds - now_s, NO_MILLIS)
            };
        }

        if deadline.seconds < now_s || (deadline.seconds == now_s && deadline.millis <= now_m) {
            return Deadline::new(0, NO_MILLIS);
        }
        if deadline.millis >= now_m {
            Deadline::new(deadline.seconds - now_s, deadline.millis - now_m)
        } else {
            Deadline::new(deadline.seconds - now_s - 1, deadline.millis + 1000 - now_m)
        }
    }

    /// Ambient batch form of `remaining`: share one adjusted `now()` read
    /// across the whole slice instead of re-deriving it per entry. Grounded
    /// on the original's bulk delay-adjustment routine, minus the VM
    /// array/value plumbing that routine also carried.
    pub fn remaining_batch(&mut self, clock: &dyn RawClock, deadlines: &mut [Deadline]) {
        for d in deadlines.iter_mut() {
            *d = self.remaining(clock, *d);
        }
    }

    fn drain_heap_time_lt(&mut self, bound: u32) {
        while let Some(top) = heap::peek(&self.arena) {
            let rec = *self.arena.get(top);
            if rec.time >= bound {
                break;
            }
            self.promote_heap_top_to_immediate(top, rec.handle, rec.oindex);
        }
    }

    fn drain_heap_le(&mut self, bound_s: u32, bound_m: u16) {
        while let Some(top) = heap::peek(&self.arena) {
            let rec = *self.arena.get(top);
            if (rec.time, rec.mtime) > (bound_s, bound_m) {
                break;
            }
            self.promote_heap_top_to_immediate(top, rec.handle, rec.oindex);
        }
    }

    fn promote_heap_top_to_immediate(&mut self, heap_idx: u32, handle: u32, oindex: u32) {
        heap::dequeue(&mut self.arena, heap_idx);
        let idx = self.arena.alloc_wheel_slot();
        let r = self.arena.get_mut(idx);
        r.handle = handle;
        r.oindex = oindex;
        r.time = 0;
        r.mtime = NO_MILLIS;
        self.arena.list_append(&mut self.immediate, idx);
        self.nshort += 1;
    }

    fn recompute_timeout(&mut self) {
        let nzero = self.list_count(self.immediate) + self.list_count(self.running);
        self.timeout = if self.nshort == nzero {
            0
        } else {
            self.wheel.next_nonempty_from(self.clock.timestamp)
        };
    }

    /// §4.F `expire`: advance the virtual clock one second at a time up to
    /// wall time, draining matured heap entries and wheel slots into
    /// `immediate` as it goes.
    pub fn expire(&mut self, clock: &dyn RawClock) {
        if self.disabled() {
            return;
        }
        let (t_wall, m_wall) = self.now(clock);
        if self.swaprate_anchored {
            self.swaprate.advance(t_wall);
        } else {
            // First tick: anchor to wall time instead of walking `advance`
            // one second at a time from `swaptime == 0`, which would spin
            // for as many seconds as the host's monotonic clock has been up.
            self.swaprate.anchor(t_wall);
            self.swaprate_anchored = true;
        }

        while self.clock.timestamp < t_wall {
            self.clock.timestamp += 1;
            self.drain_heap_time_lt(self.clock.timestamp);
            let slot = self.wheel.take_slot(self.clock.timestamp);
            if slot != NIL {
                self.splice_onto_immediate(slot);
            }
        }
        self.drain_heap_le(t_wall, m_wall);
        self.recompute_timeout();
        self.clock.invalidate();
    }

    fn splice_onto_immediate(&mut self, mut slot_head: u32) {
        // `slot_head` is a standalone list (its own count/last); walk it and
        // re-append each node to `immediate` one at a time rather than
        // splicing the raw links, since `immediate`'s head bookkeeping must
        // stay authoritative.
        while slot_head != NIL {
            let next = self.arena.get(slot_head).next;
            let cur = slot_head;
            self.arena.get_mut(cur).time = 0;
            self.arena.list_append(&mut self.immediate, cur);
            slot_head = next;
        }
    }

    /// §4.F `call`: promote `immediate` to `running` (invoking `expire`
    /// first if nothing is already running) and drain it one entry at a
    /// time through the host's `Executor`.
    pub fn call<S: ObjectStore, E: Executor<S::Obj>>(&mut self, clock: &dyn RawClock, store: &S, executor: &mut E) {
        if self.disabled() {
            return;
        }
        if self.running == NIL {
            self.expire(clock);
            self.running = self.arena.list_take_all(&mut self.immediate);
        }
        while self.running != NIL {
            let cur = self.running;
            let rec = *self.arena.get(cur);
            self.running = rec.next;
            self.arena.free(cur);
            self.nshort -= 1;

            let obj = store.resolve(rec.oindex);
            if executor.run(&obj, rec.handle).is_err() {
                crate::log::log_err(&format_args!(
                    "callout dispatch failed: oindex={} handle={}",
                    rec.oindex, rec.handle
                ));
            }
        }
    }

    fn earlier(a: Deadline, b: Deadline) -> Deadline {
        if (a.seconds, a.millis) <= (b.seconds, b.millis) {
            a
        } else {
            b
        }
    }

    /// §4.F `delay`: how long the host should sleep before the next
    /// interesting event. `(0, NO_MILLIS)` means "sleep indefinitely".
    pub fn delay(&mut self, clock: &dyn RawClock, ref_deadline: Deadline) -> Deadline {
        self.clock.invalidate();
        if self.disabled() {
            return Deadline::new(0, NO_MILLIS);
        }
        if self.immediate != NIL || self.running != NIL {
            return Deadline::new(0, 0);
        }

        let mut best: Option<Deadline> = None;
        if ref_deadline.seconds != 0 {
            best = Some(ref_deadline);
        }
        if self.timeout != 0 {
            let d = Deadline::new(self.timeout, NO_MILLIS);
            best = Some(best.map_or(d, |b| Self::earlier(b, d)));
        }
        if let Some(top) = heap::peek(&self.arena) {
            let r = self.arena.get(top);
            let d = Deadline::new(r.time, r.mtime);
            best = Some(best.map_or(d, |b| Self::earlier(b, d)));
        }

        match best {
            None => Deadline::NONE,
            Some(d) => self.remaining(clock, d),
        }
    }

    /// §4.F `info`: `(short_count, heap_count)` for observability.
    pub fn info(&self) -> (u32, u32) {
        (self.nshort, self.arena.queue_brk)
    }

    /// §4.G `swapcount`: record `n` swapped-out objects and invalidate the
    /// clock's one-tick cache (the caller implies time progression).
    pub fn swapcount(&mut self, n: u32) {
        self.swaprate.add(n);
        self.clock.invalidate();
    }

    pub fn swaprate1(&self) -> u64 {
        self.swaprate.rate1()
    }
    pub fn swaprate5(&self) -> u64 {
        self.swaprate.rate5()
    }

    /// §4.H `save`.
    pub fn save<W: Swapper>(&self, swapper: &mut W) -> Result<(), W::Error> {
        snapshot::save(
            swapper,
            &self.arena,
            &self.wheel,
            &self.clock,
            self.nshort,
            self.running,
            self.immediate,
        )
    }

    /// §4.H `restore`: the arena must already be sized to its final
    /// capacity (i.e. `Scheduler::new` was called with the new maximum)
    /// before this is invoked.
    pub fn restore<W: Swapper>(
        &mut self,
        swapper: &mut W,
        elapsed_seconds: u32,
    ) -> Result<Result<(), SchedulerError>, W::Error> {
        let new_capacity = self.arena.capacity;
        let outcome = snapshot::restore(
            swapper,
            &mut self.arena,
            &mut self.wheel,
            &mut self.clock,
            new_capacity,
            elapsed_seconds,
        )?;
        match outcome {
            Ok(r) => {
                self.running = r.running;
                self.immediate = r.immediate;
                self.nshort = r.nshort;
                self.timeout = r.timeout;
                Ok(Ok(()))
            }
            Err(e) => Ok(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Object;
    use std::cell::Cell;
    use std::vec::Vec;

    struct FakeClock(Cell<(u32, u16)>);
    impl FakeClock {
        fn at(s: u32, m: u16) -> Self {
            Self(Cell::new((s, m)))
        }
        fn set(&self, s: u32, m: u16) {
            self.0.set((s, m));
        }
    }
    impl RawClock for FakeClock {
        fn raw_mtime(&self) -> (u32, u16) {
            self.0.get()
        }
    }

    struct Obj(u32);
    impl Object for Obj {}

    struct Store;
    impl ObjectStore for Store {
        type Obj = Obj;
        fn resolve(&self, oindex: u32) -> Obj {
            Obj(oindex)
        }
    }

    struct RecordingExecutor {
        fired: Vec<(u32, u32)>,
    }
    impl Executor<Obj> for RecordingExecutor {
        type Error = ();
        fn run(&mut self, object: &Obj, handle: u32) -> Result<(), ()> {
            self.fired.push((object.0, handle));
            Ok(())
        }
    }

    // Scenario 1: immediate callout fires on the next `call`.
    #[test]
    fn immediate_callout_fires_immediately() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        let (deadline, bucket) = sched.check(&clock, 1, 0, NO_MILLIS).unwrap();
        assert_eq!(bucket, Bucket::Immediate);
        sched.create(7, 1, deadline, bucket);

        let store = Store;
        let mut exec = RecordingExecutor { fired: Vec::new() };
        sched.call(&clock, &store, &mut exec);

        assert_eq!(exec.fired, vec![(7, 1)]);
        assert_eq!(sched.info().0, 0);
    }

    // Scenario 2: wheel-horizon callout waits, then fires once its slot matures.
    #[test]
    fn wheel_callout_waits_then_fires() {
        let clock = FakeClock::at(100, 0);
        let mut sched = Scheduler::new(10);
        sched.expire(&clock); // anchor timestamp at 100
        let (deadline, bucket) = sched.check(&clock, 1, 5, NO_MILLIS).unwrap();
        assert_eq!(bucket, Bucket::Wheel);
        assert_eq!(deadline.seconds, 105);
        sched.create(9, 2, deadline, bucket);

        clock.set(104, 0);
        let d = sched.delay(&clock, Deadline::NONE);
        assert_eq!((d.seconds, d.millis), (1, NO_MILLIS));

        clock.set(105, 0);
        sched.expire(&clock);
        let store = Store;
        let mut exec = RecordingExecutor { fired: Vec::new() };
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![(9, 2)]);
    }

    // Scenario 3 / P5: same-slot callouts fire in insertion order.
    #[test]
    fn same_slot_callouts_fire_fifo() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        sched.expire(&clock);
        let (d1, b1) = sched.check(&clock, 1, 5, NO_MILLIS).unwrap();
        sched.create(1, 1, d1, b1);
        let (d2, b2) = sched.check(&clock, 1, 5, NO_MILLIS).unwrap();
        sched.create(1, 2, d2, b2);

        clock.set(5, 0);
        sched.expire(&clock);
        let store = Store;
        let mut exec = RecordingExecutor { fired: Vec::new() };
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![(1, 1), (1, 2)]);
    }

    // Scenario 4: sub-second heap deadline fires only once milliseconds catch up.
    #[test]
    fn subsecond_heap_deadline_precise() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        let (deadline, bucket) = sched.check(&clock, 1, 200, 500).unwrap();
        assert_eq!(bucket, Bucket::Heap);
        sched.create(3, 5, deadline, bucket);
        assert_eq!(sched.info().1, 1);

        clock.set(200, 499);
        sched.expire(&clock);
        let store = Store;
        let mut exec = RecordingExecutor { fired: Vec::new() };
        sched.call(&clock, &store, &mut exec);
        assert!(exec.fired.is_empty());

        clock.set(200, 500);
        sched.expire(&clock);
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![(3, 5)]);
    }

    // Scenario 5: the fourth check on a 3-slot arena is rejected.
    // A whole-second deadline beyond the wheel horizon heaps with millis
    // normalized to 0, not NO_MILLIS -- it must fire the instant `timestamp`
    // reaches its second, not one second late, and must sort ahead of a
    // same-second sub-second entry.
    #[test]
    fn heaped_whole_second_deadline_fires_on_time_and_sorts_first() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        let (d1, b1) = sched.check(&clock, 1, 300, NO_MILLIS).unwrap();
        sched.create(1, 1, d1, b1);
        let (d2, b2) = sched.check(&clock, 1, 300, 500).unwrap();
        sched.create(2, 2, d2, b2);

        clock.set(300, 0);
        sched.expire(&clock);
        let store = Store;
        let mut exec = RecordingExecutor { fired: Vec::new() };
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![(1, 1)]);

        clock.set(300, 500);
        sched.expire(&clock);
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn too_many_callouts_on_exhausted_arena() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(3);
        for h in 0..3 {
            let (d, b) = sched.check(&clock, 1, 0, NO_MILLIS).unwrap();
            sched.create(1, h + 1, d, b);
        }
        assert_eq!(sched.check(&clock, 1, 0, NO_MILLIS), Err(SchedulerError::TooManyCallouts));
    }

    // Scenario 8 / P8: a callout created inside a callback doesn't fire
    // until the *next* `call`.
    #[test]
    fn callout_created_during_dispatch_waits_for_next_call() {
        struct ReentrantExecutor {
            fired: Vec<u32>,
        }
        // Can't call back into `Scheduler` from inside `Executor::run`
        // without a shared reference cycle in this harness, so this test
        // instead verifies the data-structure guarantee directly: an
        // `immediate` create during the drain of `running` lands on the
        // (separate) `immediate` list, not on `running`.
        impl Executor<Obj> for ReentrantExecutor {
            type Error = ();
            fn run(&mut self, object: &Obj, handle: u32) -> Result<(), ()> {
                self.fired.push(object.0 + handle);
                Ok(())
            }
        }

        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        let (d, b) = sched.check(&clock, 1, 0, NO_MILLIS).unwrap();
        sched.create(1, 1, d, b);

        // Simulate "created while running" by injecting directly after
        // `running` is populated but before `call` drains it.
        sched.running = sched.arena.list_take_all(&mut sched.immediate);
        let (d2, b2) = sched.check(&clock, 1, 0, NO_MILLIS).unwrap();
        sched.create(2, 2, d2, b2);
        assert_ne!(sched.immediate, NIL);
        assert_ne!(sched.running, NIL);

        let store = Store;
        let mut exec = ReentrantExecutor { fired: Vec::new() };
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![2]); // only the originally-running item fired
        assert_ne!(sched.immediate, NIL); // the reentrant create is still pending

        // A second `call` (no new `running` this time) picks it up.
        sched.call(&clock, &store, &mut exec);
        assert_eq!(exec.fired, vec![2, 4]);
        assert_eq!(sched.immediate, NIL);
    }

    #[test]
    fn del_removes_wheel_entry() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        sched.expire(&clock);
        let (d, b) = sched.check(&clock, 1, 5, NO_MILLIS).unwrap();
        sched.create(1, 1, d, b);
        assert_eq!(sched.info().0, 1);
        sched.del(1, 1, d);
        assert_eq!(sched.info().0, 0);
    }

    #[test]
    fn remaining_batch_updates_every_entry_against_one_clock_read() {
        let clock = FakeClock::at(100, 0);
        let mut sched = Scheduler::new(10);
        sched.expire(&clock);
        let mut batch = [
            Deadline::new(105, NO_MILLIS),
            Deadline::new(110, NO_MILLIS),
            Deadline::new(100, NO_MILLIS), // already due
        ];
        sched.remaining_batch(&clock, &mut batch);
        assert_eq!((batch[0].seconds, batch[0].millis), (5, NO_MILLIS));
        assert_eq!((batch[1].seconds, batch[1].millis), (10, NO_MILLIS));
        assert_eq!((batch[2].seconds, batch[2].millis), (0, NO_MILLIS));
    }

    #[test]
    fn del_removes_heap_entry() {
        let clock = FakeClock::at(0, 0);
        let mut sched = Scheduler::new(10);
        let (d, b) = sched.check(&clock, 1, 200, 500).unwrap();
        sched.create(1, 1, d, b);
        assert_eq!(sched.info().1, 1);
        sched.del(1, 1, d);
        assert_eq!(sched.info().1, 0);
    }
}
