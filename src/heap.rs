//! Priority queue (§4.C): a binary min-heap over the arena's heap prefix,
//! keyed lexicographically on `(time, mtime)`.
//!
//! The heap lives in `arena.records[1..=arena.queue_brk]`; index `0` is a
//! zero-valued sentinel so the sift-up loop can run `while key(parent) >
//! key(i)` without an explicit `i > 0` bounds check (the sentinel's key is
//! the smallest possible, so the loop always terminates there).

use crate::arena::CalloutArena;

#[inline]
fn key(a: &CalloutArena, i: u32) -> (u32, u16) {
    let r = a.get(i);
    (r.time, r.mtime)
}

#[inline]
fn less(a: &CalloutArena, i: u32, j: u32) -> bool {
    key(a, i) < key(a, j)
}

/// §4.C `enqueue`: allocate a new heap slot and sift it upward to its
/// sorted position. Returns the slot index so the caller can fill in
/// `handle`/`oindex`.
pub(crate) fn enqueue(a: &mut CalloutArena, t: u32, m: u16) -> u32 {
    let mut i = a.alloc_heap_slot();
    a.get_mut(i).time = t;
    a.get_mut(i).mtime = m;

    let mut j = i / 2;
    while j > 0 && less(a, i, j) {
        swap(a, i, j);
        i = j;
        j = i / 2;
    }
    i
}

/// §4.C `dequeue`: remove the entry at heap index `i` (1-based), replacing
/// it with the last entry and sifting in whichever direction restores
/// order.
pub(crate) fn dequeue(a: &mut CalloutArena, i: u32) {
    let last = a.queue_brk;
    if i == last {
        a.queue_brk -= 1;
        return;
    }

    move_into(a, last, i);
    a.queue_brk -= 1;

    // `i` now holds what used to be `last`'s key; it may need to move in
    // either direction to restore heap order.
    sift_down(a, i);
    sift_up(a, i);
}

fn sift_up(a: &mut CalloutArena, mut i: u32) {
    let mut j = i / 2;
    while j > 0 && less(a, i, j) {
        swap(a, i, j);
        i = j;
        j = i / 2;
    }
}

fn sift_down(a: &mut CalloutArena, mut i: u32) {
    loop {
        let mut smallest = i;
        let l = i * 2;
        let r = l + 1;
        if l <= a.queue_brk && less(a, l, smallest) {
            smallest = l;
        }
        if r <= a.queue_brk && less(a, r, smallest) {
            smallest = r;
        }
        if smallest == i {
            break;
        }
        swap(a, i, smallest);
        i = smallest;
    }
}

/// Peek the minimum entry (heap index 1), if any.
pub(crate) fn peek(a: &CalloutArena) -> Option<u32> {
    if a.queue_brk == 0 {
        None
    } else {
        Some(1)
    }
}

fn swap(a: &mut CalloutArena, i: u32, j: u32) {
    let ri = *a.get(i);
    let rj = *a.get(j);
    let dst_i = a.get_mut(i);
    dst_i.time = rj.time;
    dst_i.mtime = rj.mtime;
    dst_i.handle = rj.handle;
    dst_i.oindex = rj.oindex;
    let dst_j = a.get_mut(j);
    dst_j.time = ri.time;
    dst_j.mtime = ri.mtime;
    dst_j.handle = ri.handle;
    dst_j.oindex = ri.oindex;
}

fn move_into(a: &mut CalloutArena, from: u32, to: u32) {
    let src = *a.get(from);
    let dst = a.get_mut(to);
    dst.time = src.time;
    dst.mtime = src.mtime;
    dst.handle = src.handle;
    dst.oindex = src.oindex;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(a: &mut CalloutArena, t: u32, m: u16, handle: u32) -> u32 {
        let i = enqueue(a, t, m);
        a.get_mut(i).handle = handle;
        i
    }

    #[test]
    fn heap_order_after_sequence() {
        let mut a = CalloutArena::new(16);
        push(&mut a, 50, 0, 1);
        push(&mut a, 10, 0, 2);
        push(&mut a, 30, 0, 3);
        push(&mut a, 10, 500, 4);
        push(&mut a, 5, 0xFFFF, 5);

        for i in 1..=a.queue_brk {
            let parent = i / 2;
            if parent > 0 {
                assert!(key(&a, parent) <= key(&a, i), "heap order violated at {i}");
            }
        }
        assert_eq!(peek(&a).map(|i| a.get(i).handle), Some(5));
    }

    #[test]
    fn dequeue_maintains_order() {
        let mut a = CalloutArena::new(16);
        for t in [100, 20, 90, 10, 50] {
            push(&mut a, t, 0, t);
        }
        // find wherever later insertions left the (10) entry and remove it
        let victim = (1..=a.queue_brk).find(|&i| a.get(i).handle == 10).unwrap();
        dequeue(&mut a, victim);
        let mut seen = arrayvec::ArrayVec::<u32, 4>::new();
        while let Some(top) = peek(&a) {
            seen.push(a.get(top).handle);
            dequeue(&mut a, top);
        }
        assert_eq!(seen.as_slice(), &[20, 50, 90, 100]);
    }
}
