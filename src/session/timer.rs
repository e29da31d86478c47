//! Clock-driven timers owned by a session.
//!
//! Nothing here runs on its own: the owner calls [`Scheduler::advance`] from
//! its tick handler with the current clock reading (seconds) and reacts to the
//! handles that fired. Dropping or clearing the scheduler releases every timer,
//! so a torn-down session cannot leave callbacks behind.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum Repeat {
    Once,
    Every(f64),
}

#[derive(Clone, Debug)]
struct Timer {
    handle: TimerHandle,
    due: f64,
    repeat: Repeat,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once, `delay` seconds after `now`.
    pub fn once(&mut self, now: f64, delay: f64) -> TimerHandle {
        self.insert(now + delay, Repeat::Once)
    }

    /// Fire every `period` seconds, first at `now + period`.
    /// Non-positive periods are treated as one-shot to keep `advance` bounded.
    pub fn every(&mut self, now: f64, period: f64) -> TimerHandle {
        let repeat = if period > 0.0 {
            Repeat::Every(period)
        } else {
            Repeat::Once
        };
        self.insert(now + period.max(0.0), repeat)
    }

    fn insert(&mut self, due: f64, repeat: Repeat) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.timers.push(Timer {
            handle,
            due,
            repeat,
        });
        handle
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Collect every firing due at or before `now`, in due order. A repeating
    /// timer that fell several periods behind fires once per missed period.
    pub fn advance(&mut self, now: f64) -> Vec<TimerHandle> {
        let mut fired: Vec<(f64, TimerHandle)> = Vec::new();

        for timer in &mut self.timers {
            while timer.due <= now {
                fired.push((timer.due, timer.handle));
                match timer.repeat {
                    Repeat::Every(period) => timer.due += period,
                    Repeat::Once => break,
                }
            }
        }

        self.timers
            .retain(|t| !(t.repeat == Repeat::Once && t.due <= now));

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, handle)| handle).collect()
    }
}
