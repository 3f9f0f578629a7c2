use core::time::Duration;

/// Identifies one scheduled repetition so it can be cancelled later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// Fixed-cadence timer provided by the host.
///
/// The host calls [`BombTask::tick`](crate::BombTask::tick) once per `period`, at most `max_firings` times, until the
/// handle is cancelled. Firing fewer times than that is fine.
pub trait Scheduler {
    fn schedule(&mut self, period: Duration, max_firings: usize) -> TimerHandle;

    /// Cancelling an unknown or already finished handle does nothing.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub handle: TimerHandle,
    pub period: Duration,
    pub remaining: usize,
}

/// Scheduler driven by hand, for tests and hosts without a clock of their own.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    active: Option<Schedule>,
    next_handle: u32,
    scheduled: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<Schedule> {
        self.active
    }

    /// Consumes one firing of the active schedule, returning whether there was one to fire.
    pub fn take_firing(&mut self) -> bool {
        match &mut self.active {
            Some(schedule) if schedule.remaining > 0 => {
                schedule.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// How many times [`Scheduler::schedule`] was called.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    /// How many live schedules were cancelled.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration, max_firings: usize) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.scheduled += 1;
        if let Some(previous) = self.active.replace(Schedule {
            handle,
            period,
            remaining: max_firings,
        }) {
            log::warn!("schedule {:?} replaced without cancel", previous.handle);
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.active.is_some_and(|schedule| schedule.handle == handle) {
            self.active = None;
            self.cancelled += 1;
        }
    }
}
