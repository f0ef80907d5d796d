//! Periodic notifications for windows
//!
//! A [`Timer`] fires when it is running, has at least one subscribed window,
//! and more than `interval` ticks have passed since it last fired. Firing is
//! not real-time: the only guarantee is that at least the interval elapsed.

use super::{Gui, TimerId, WndId};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Timer state shared between the handle and the GUI registry
#[derive(Debug, Clone)]
pub(crate) struct TimerState {
    pub(crate) interval: i32,
    pub(crate) last_fire: i32,
    pub(crate) running: bool,
    pub(crate) subscribers: BTreeSet<WndId>,
}

impl TimerState {
    pub(crate) fn should_fire(&self, ticks: i32) -> bool {
        self.running
            && !self.subscribers.is_empty()
            && i64::from(self.interval) < i64::from(ticks) - i64::from(self.last_fire)
    }
}

/// A timer registered with a [`Gui`] for as long as the handle lives
pub struct Timer<'gui> {
    gui: &'gui Gui,
    id: TimerId,
    state: Rc<RefCell<TimerState>>,
}

impl<'gui> Timer<'gui> {
    /// A running timer whose interval starts now
    pub fn new(gui: &'gui Gui, interval: i32) -> Self {
        Self::with_start_time(gui, interval, 0)
    }

    /// A running timer whose interval starts at `start_time`; zero means now
    pub fn with_start_time(gui: &'gui Gui, interval: i32, start_time: i32) -> Self {
        let last_fire = if start_time != 0 {
            start_time
        } else {
            gui.ticks()
        };
        let state = Rc::new(RefCell::new(TimerState {
            interval,
            last_fire,
            running: true,
            subscribers: BTreeSet::new(),
        }));
        let id = gui.register_timer(Rc::clone(&state));
        Timer { gui, id, state }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Whether any window listens to this timer
    pub fn is_connected(&self) -> bool {
        !self.state.borrow().subscribers.is_empty()
    }

    pub fn interval(&self) -> i32 {
        self.state.borrow().interval
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn last_fire(&self) -> i32 {
        self.state.borrow().last_fire
    }

    pub fn should_fire(&self, ticks: i32) -> bool {
        self.state.borrow().should_fire(ticks)
    }

    /// The windows connected to this timer
    pub fn subscribers(&self) -> BTreeSet<WndId> {
        self.state.borrow().subscribers.clone()
    }

    /// Set the last firing time to `start_time`, or to now when it is zero
    pub fn reset(&self, start_time: i32) {
        let last_fire = if start_time != 0 {
            start_time
        } else {
            self.gui.ticks()
        };
        self.state.borrow_mut().last_fire = last_fire;
    }

    pub fn set_interval(&self, interval: i32) {
        self.state.borrow_mut().interval = interval;
    }

    pub fn connect(&self, wnd: WndId) {
        self.state.borrow_mut().subscribers.insert(wnd);
    }

    pub fn disconnect(&self, wnd: WndId) {
        self.state.borrow_mut().subscribers.remove(&wnd);
    }

    /// Resume firing; the last firing time is left alone
    pub fn start(&self) {
        self.state.borrow_mut().running = true;
    }

    /// Stop firing until [`start`](Self::start) is called
    pub fn stop(&self) {
        self.state.borrow_mut().running = false;
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.gui.remove_timer(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::ManualClock;

    fn gui_at(ticks: i32) -> (Gui, ManualClock) {
        let clock = ManualClock::new(ticks);
        (Gui::new(clock.clone()), clock)
    }

    #[test]
    fn test_new_timer_starts_now_and_running() {
        let (gui, _clock) = gui_at(250);
        let timer = Timer::new(&gui, 100);

        assert_eq!(timer.last_fire(), 250);
        assert_eq!(timer.interval(), 100);
        assert!(timer.is_running());
        assert!(!timer.is_connected());
        assert_eq!(gui.timer_count(), 1);
    }

    #[test]
    fn test_explicit_start_time() {
        let (gui, _clock) = gui_at(250);
        let timer = Timer::with_start_time(&gui, 100, 40);
        assert_eq!(timer.last_fire(), 40);
    }

    #[test]
    fn test_should_fire_boundary() {
        let (gui, _clock) = gui_at(1000);
        let timer = Timer::new(&gui, 100);
        timer.connect(gui.create_wnd_id());

        assert!(!timer.should_fire(1100));
        assert!(timer.should_fire(1101));
    }

    #[test]
    fn test_should_fire_requires_subscribers_and_running() {
        let (gui, _clock) = gui_at(0);
        let timer = Timer::with_start_time(&gui, 10, 1);
        assert!(!timer.should_fire(1000));

        let wnd = gui.create_wnd_id();
        timer.connect(wnd);
        assert!(timer.should_fire(1000));

        timer.stop();
        assert!(!timer.should_fire(1000));
        assert!(timer.is_connected());

        timer.start();
        assert!(timer.should_fire(1000));
    }

    #[test]
    fn test_should_fire_does_not_overflow() {
        let (gui, _clock) = gui_at(0);
        let timer = Timer::with_start_time(&gui, 0, i32::MIN);
        timer.connect(gui.create_wnd_id());
        assert!(timer.should_fire(i32::MAX));

        timer.reset(i32::MAX);
        assert!(!timer.should_fire(i32::MIN));
    }

    #[test]
    fn test_reset() {
        let (gui, clock) = gui_at(10);
        let timer = Timer::new(&gui, 5);

        clock.set(500);
        timer.reset(0);
        assert_eq!(timer.last_fire(), 500);

        timer.reset(42);
        assert_eq!(timer.last_fire(), 42);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let (gui, _clock) = gui_at(0);
        let timer = Timer::new(&gui, 5);
        let wnd = gui.create_wnd_id();

        timer.connect(wnd);
        timer.connect(wnd);
        assert_eq!(timer.subscribers().len(), 1);

        timer.disconnect(gui.create_wnd_id());
        assert_eq!(timer.subscribers().len(), 1);

        timer.disconnect(wnd);
        assert!(!timer.is_connected());
    }

    #[test]
    fn test_drop_deregisters() {
        let (gui, _clock) = gui_at(0);
        let first = Timer::new(&gui, 1);
        {
            let _second = Timer::new(&gui, 2);
            assert_eq!(gui.timer_count(), 2);
        }
        assert_eq!(gui.timer_count(), 1);
        drop(first);
        assert_eq!(gui.timer_count(), 0);
    }
}
