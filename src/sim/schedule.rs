// schedule.rs - One frame callback for every live map
//
// The platform drives `tick` from its display-refresh callback and asks for
// another tick only while `tick` returns true.

use std::cell::RefCell;
use std::rc::Rc;

/// What a frame did, and whether it wants another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Geometry updated and one render issued.
    Rendered,
    /// Nothing done this frame; keep scheduling.
    Skipped,
    /// Never schedule this instance again.
    Stopped,
}

pub trait Animate {
    fn frame(&mut self, now_ms: f64) -> FrameOutcome;
}

pub type SharedAnimation = Rc<RefCell<dyn Animate>>;

#[derive(Default)]
pub struct FrameScheduler {
    live: Vec<SharedAnimation>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance. Returns true when the scheduler was idle and the
    /// caller must request the first tick.
    pub fn register(&mut self, animation: SharedAnimation) -> bool {
        let was_idle = self.live.is_empty();
        self.live.push(animation);
        was_idle
    }

    /// Run one frame of every instance and drop the stopped ones.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.live.retain(|animation| match animation.try_borrow_mut() {
            Ok(mut a) => a.frame(now_ms) != FrameOutcome::Stopped,
            // busy in an event handler; try again next frame
            Err(_) => true,
        });
        !self.live.is_empty()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        frames_left: u32,
        seen: Vec<f64>,
    }

    impl Animate for Countdown {
        fn frame(&mut self, now_ms: f64) -> FrameOutcome {
            self.seen.push(now_ms);
            if self.frames_left == 0 {
                return FrameOutcome::Stopped;
            }
            self.frames_left -= 1;
            FrameOutcome::Rendered
        }
    }

    fn countdown(frames_left: u32) -> Rc<RefCell<Countdown>> {
        Rc::new(RefCell::new(Countdown { frames_left, seen: Vec::new() }))
    }

    #[test]
    fn first_registration_requests_a_tick() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.register(countdown(1)));
        assert!(!scheduler.register(countdown(1)));
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn stopped_instances_are_dropped() {
        let mut scheduler = FrameScheduler::new();
        let short = countdown(0);
        let long = countdown(2);
        scheduler.register(short.clone());
        scheduler.register(long.clone());

        assert!(scheduler.tick(16.0));
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.tick(32.0));
        assert!(scheduler.tick(48.0));
        assert!(!scheduler.tick(64.0));
        assert!(scheduler.is_empty());

        assert_eq!(short.borrow().seen, vec![16.0]);
        assert_eq!(long.borrow().seen, vec![16.0, 32.0, 48.0, 64.0]);
    }

    #[test]
    fn borrowed_instance_is_skipped_not_dropped() {
        let mut scheduler = FrameScheduler::new();
        let anim = countdown(5);
        scheduler.register(anim.clone());
        {
            let _held = anim.borrow_mut();
            assert!(scheduler.tick(1.0));
        }
        assert!(anim.borrow().seen.is_empty());
        scheduler.tick(2.0);
        assert_eq!(anim.borrow().seen, vec![2.0]);
    }
}
