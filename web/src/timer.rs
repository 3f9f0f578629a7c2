use std::rc::Rc;
use std::time::Duration;

use bret_core::{Scheduler, TimerHandle};
use gloo::timers::callback::Interval;
use wasm_bindgen::closure::Closure;

/// [`Scheduler`] on top of `setInterval`.
///
/// Every firing calls `on_tick`, which is expected to forward to [`bret_core::BombTask::tick`].
pub struct IntervalScheduler {
    on_tick: Rc<dyn Fn()>,
    active: Option<(TimerHandle, Interval)>,
    // a cancelled interval's closure may still be on the stack when the task stops from inside a tick
    retired: Option<Closure<dyn FnMut()>>,
    next_handle: u32,
}

impl IntervalScheduler {
    pub fn new(on_tick: Rc<dyn Fn()>) -> Self {
        Self {
            on_tick,
            active: None,
            retired: None,
            next_handle: 0,
        }
    }
}

fn period_millis(period: Duration) -> u32 {
    period.as_millis().clamp(1, u32::MAX.into()) as u32
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, period: Duration, max_firings: usize) -> TimerHandle {
        if let Some((old, _)) = &self.active {
            let old = *old;
            self.cancel(old);
        }
        self.next_handle = self.next_handle.wrapping_add(1);
        let handle = TimerHandle(self.next_handle);

        let on_tick = self.on_tick.clone();
        let mut remaining = max_firings;
        let interval = Interval::new(period_millis(period), move || {
            if remaining == 0 {
                return;
            }
            remaining -= 1;
            on_tick();
        });
        log::debug!(
            "Scheduled {:?} every {:?}, {} firings",
            handle,
            period,
            max_firings
        );
        self.active = Some((handle, interval));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        match self.active.take() {
            Some((active, interval)) if active == handle => {
                log::debug!("Cancelled {:?}", handle);
                self.retired = Some(interval.cancel());
            }
            other => self.active = other,
        }
    }
}
