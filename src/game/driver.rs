//! Frame Driver
//!
//! Sequences one [`GameSession`] tick per display refresh and guarantees at
//! most one live simulation loop. Every driver holds an [`InstanceToken`]
//! from a shared [`InstanceSlot`]; installing a new game invalidates the old
//! token, and a driver whose token is stale refuses to run.

use std::cell::Cell;
use std::rc::Rc;
use crate::input::InputSnapshot;
use super::runtime::{GameSession, Viewport};

/// Handle proving a driver is the current game instance
#[derive(Debug, Clone)]
pub struct InstanceToken {
    id: u64,
    current: Rc<Cell<u64>>,
}

impl InstanceToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.current.get() == self.id
    }
}

/// Owner of the "current instance" id
#[derive(Debug)]
pub struct InstanceSlot {
    current: Rc<Cell<u64>>,
    next_id: u64,
}

impl InstanceSlot {
    pub fn new() -> Self {
        Self {
            // 0 is never handed out
            current: Rc::new(Cell::new(0)),
            next_id: 1,
        }
    }

    /// Make a new instance current, invalidating any earlier token
    pub fn install(&mut self) -> InstanceToken {
        let id = self.next_id;
        self.next_id += 1;
        self.current.set(id);
        InstanceToken {
            id,
            current: Rc::clone(&self.current),
        }
    }
}

impl Default for InstanceSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame ran; schedule the next one
    Continue,
    /// This driver has been replaced; stop scheduling it
    Cancelled,
}

/// Runs a session, one frame at a time
pub struct FrameDriver {
    session: GameSession,
    token: InstanceToken,
}

impl FrameDriver {
    /// Take over the slot with a new session
    pub fn install(slot: &mut InstanceSlot, session: GameSession) -> Self {
        let token = slot.install();
        tracing::info!("game instance {} started", token.id());
        Self { session, token }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// One scheduled frame: check the token, pick up viewport changes, tick,
    /// then log what the tick reported.
    pub fn frame(&mut self, input: InputSnapshot, viewport: Viewport) -> FrameStatus {
        if !self.token.is_current() {
            tracing::debug!(
                "game instance {} is stale after {} frames, stopping",
                self.token.id(),
                self.session.frame()
            );
            return FrameStatus::Cancelled;
        }
        if viewport != self.session.viewport() {
            self.session.resize(viewport.width, viewport.height);
        }
        self.session.tick(input);

        for event in self.session.events.iter() {
            if event.is_routine() {
                tracing::trace!(?event, "frame event");
            } else {
                tracing::debug!(?event, "frame event");
            }
        }
        FrameStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::storage::MemoryStore;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), Box::new(MemoryStore::new()), 5)
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_install_invalidates_previous() {
        let mut slot = InstanceSlot::new();
        let first = slot.install();
        assert!(first.is_current());
        let second = slot.install();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_replaced_driver_stops_ticking() {
        let mut slot = InstanceSlot::new();
        let mut old = FrameDriver::install(&mut slot, session());
        assert_eq!(old.frame(InputSnapshot::default(), viewport()), FrameStatus::Continue);
        let frames = old.session().frame();

        let mut new = FrameDriver::install(&mut slot, session());
        assert_eq!(old.frame(InputSnapshot::default(), viewport()), FrameStatus::Cancelled);
        assert_eq!(old.session().frame(), frames);

        assert_eq!(new.frame(InputSnapshot::default(), viewport()), FrameStatus::Continue);
        assert_eq!(new.session().frame(), 1);
    }

    #[test]
    fn test_frame_applies_resize() {
        let mut slot = InstanceSlot::new();
        let mut driver = FrameDriver::install(&mut slot, session());
        driver.frame(InputSnapshot::default(), Viewport::new(1280.0, 720.0));
        assert_eq!(driver.session().viewport(), Viewport::new(1280.0, 720.0));
        assert_eq!(driver.session().snapshot().lava_level, 720.0 - 32.0);
    }

    #[test]
    fn test_window_height_differs_from_config() {
        let mut slot = InstanceSlot::new();
        let mut driver = FrameDriver::install(&mut slot, session());
        for _ in 0..60 {
            driver.frame(InputSnapshot::default(), Viewport::new(800.0, 450.0));
        }
        let snapshot = driver.session().snapshot();
        assert_eq!(snapshot.phase, crate::game::run_state::RunPhase::Running);
        assert!(snapshot.platforms.iter().all(|p| p.rect.y < snapshot.lava_level));
    }
}
