//! GUI context: tick clock, window identities and the timer registry
//!
//! A [`Gui`] is the central object of a single-threaded event loop. It owns
//! the clock that timers read, hands out [`WndId`]s, and keeps a registry of
//! every live [`Timer`]. Once per loop iteration the owner calls
//! [`Gui::process_timers`], which delivers [`WndEvent::TimerFiring`] to the
//! windows subscribed to each due timer.
//!
//! The registry is interior-mutable: timers register and deregister through
//! a shared `&Gui`, including while `process_timers` is dispatching.

mod timer;

pub use timer::Timer;
pub(crate) use timer::TimerState;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic integer clock, in milliseconds
pub trait TickSource {
    fn ticks(&self) -> i32;
}

/// Milliseconds elapsed since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    fn ticks(&self) -> i32 {
        i32::try_from(self.start.elapsed().as_millis()).unwrap_or(i32::MAX)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same counter, so a test can keep one handle and give
/// the other to a [`Gui`].
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ticks: Rc<Cell<i32>>,
}

impl ManualClock {
    pub fn new(ticks: i32) -> Self {
        ManualClock {
            ticks: Rc::new(Cell::new(ticks)),
        }
    }

    pub fn set(&self, ticks: i32) {
        self.ticks.set(ticks);
    }

    pub fn advance(&self, delta: i32) {
        self.ticks.set(self.ticks.get().saturating_add(delta));
    }
}

impl TickSource for ManualClock {
    fn ticks(&self) -> i32 {
        self.ticks.get()
    }
}

/// Identity of a registered timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Identity of a window that can receive events.
///
/// Timers only hold these ids; the windows themselves belong to the caller.
/// Ids come from [`Gui::create_wnd_id`], so no two windows share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WndId(u64);

impl WndId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Events delivered to windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WndEvent {
    TimerFiring { ticks: i32, timer: TimerId },
}

/// The GUI context
pub struct Gui {
    clock: Box<dyn TickSource>,
    timers: RefCell<BTreeMap<TimerId, Rc<RefCell<TimerState>>>>,
    next_timer_id: Cell<u64>,
    next_wnd_id: Cell<u64>,
}

impl Gui {
    pub fn new(clock: impl TickSource + 'static) -> Self {
        Gui {
            clock: Box::new(clock),
            timers: RefCell::new(BTreeMap::new()),
            next_timer_id: Cell::new(0),
            next_wnd_id: Cell::new(1),
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(SystemClock::new())
    }

    /// Current time in milliseconds
    pub fn ticks(&self) -> i32 {
        self.clock.ticks()
    }

    /// Allocate an identity for a new window
    pub fn create_wnd_id(&self) -> WndId {
        let id = self.next_wnd_id.get();
        self.next_wnd_id.set(id + 1);
        WndId(id)
    }

    /// Number of live timers
    pub fn timer_count(&self) -> usize {
        self.timers.borrow().len()
    }

    pub(crate) fn register_timer(&self, state: Rc<RefCell<TimerState>>) -> TimerId {
        let id = TimerId(self.next_timer_id.get());
        self.next_timer_id.set(id.0 + 1);
        self.timers.borrow_mut().insert(id, state);
        tracing::trace!(timer = id.0, "timer registered");
        id
    }

    pub(crate) fn remove_timer(&self, id: TimerId) {
        if self.timers.borrow_mut().remove(&id).is_some() {
            tracing::trace!(timer = id.0, "timer removed");
        }
    }

    /// Disconnect a destroyed window from every timer
    pub fn remove_wnd(&self, wnd: WndId) {
        for state in self.timers.borrow().values() {
            state.borrow_mut().subscribers.remove(&wnd);
        }
        tracing::debug!(wnd = wnd.0, "window removed from timers");
    }

    /// Fire every due timer.
    ///
    /// Each subscriber of a due timer receives one `TimerFiring` event through
    /// `deliver`, then the timer is rearmed at the current tick. `deliver`
    /// may create or drop timers and change subscriptions; a timer dropped
    /// before its turn does not fire. Returns how many timers fired.
    pub fn process_timers(&self, mut deliver: impl FnMut(WndId, WndEvent)) -> usize {
        let ticks = self.ticks();
        let snapshot: Vec<(TimerId, Rc<RefCell<TimerState>>)> = self
            .timers
            .borrow()
            .iter()
            .map(|(id, state)| (*id, Rc::clone(state)))
            .collect();

        let mut fired = 0;
        for (id, state) in snapshot {
            if !self.timers.borrow().contains_key(&id) {
                continue;
            }

            let subscribers = {
                let state = state.borrow();
                if !state.should_fire(ticks) {
                    continue;
                }
                state.subscribers.clone()
            };

            tracing::debug!(timer = id.0, ticks, windows = subscribers.len(), "timer firing");
            for wnd in subscribers {
                deliver(wnd, WndEvent::TimerFiring { ticks, timer: id });
            }
            state.borrow_mut().last_fire = ticks;
            fired += 1;
        }

        fired
    }
}

impl Default for Gui {
    fn default() -> Self {
        Self::with_system_clock()
    }
}
