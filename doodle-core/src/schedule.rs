use std::fmt;
use std::time::Duration;

/// Identifies one round's worth of scheduled work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoundId(u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    slot: u32,
    generation: u32,
    round: RoundId,
}

impl TimerHandle {
    pub fn round(&self) -> RoundId {
        self.round
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    CountdownElapsed,
    DrawingTick,
    GuessDue { index: usize },
    RevealElapsed,
}

/// A request for the driver: call back with `handle` after `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    pub delay: Duration,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    pending: Option<TimerKind>,
}

/// Cancellable one-shot timers for a session. The driver sleeps and hands
/// the handle back; handles that were cancelled, already fired, or issued
/// for an earlier round are rejected by [`Schedule::fire`].
#[derive(Debug, Default)]
pub struct Schedule {
    slots: Vec<Slot>,
    free: Vec<u32>,
    round: RoundId,
    outbox: Vec<ScheduledTimer>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_round(&self) -> RoundId {
        self.round
    }

    /// Invalidate everything pending and open a new round
    pub fn begin_round(&mut self) -> RoundId {
        self.cancel_all();
        self.round = RoundId(self.round.0 + 1);
        self.round
    }

    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerHandle {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let entry = &mut self.slots[slot as usize];
        entry.pending = Some(kind);

        let handle = TimerHandle {
            slot,
            generation: entry.generation,
            round: self.round,
        };
        self.outbox.push(ScheduledTimer {
            handle,
            kind,
            delay,
        });
        handle
    }

    /// Returns false when the handle was already dead
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        self.release(handle.slot);
        self.outbox.retain(|timer| timer.handle != handle);
        true
    }

    pub fn cancel_all(&mut self) {
        for slot in 0..self.slots.len() {
            if self.slots[slot].pending.is_some() {
                self.release(slot as u32);
            }
        }
        self.outbox.clear();
    }

    /// Consume a due handle. `None` means the callback is stale and must be ignored.
    pub fn fire(&mut self, handle: TimerHandle) -> Option<TimerKind> {
        if !self.is_live(handle) {
            return None;
        }
        let kind = self.slots[handle.slot as usize].pending;
        self.release(handle.slot);
        kind
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        handle.round == self.round
            && self
                .slots
                .get(handle.slot as usize)
                .is_some_and(|slot| slot.generation == handle.generation && slot.pending.is_some())
    }

    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|s| s.pending.is_some()).count()
    }

    /// Hand newly scheduled timers to the driver
    pub fn take_scheduled(&mut self) -> Vec<ScheduledTimer> {
        std::mem::take(&mut self.outbox)
    }

    fn release(&mut self, slot: u32) {
        let entry = &mut self.slots[slot as usize];
        entry.pending = None;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);
    }
}
