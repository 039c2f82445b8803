use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Sound cues the arena can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEvent {
    Land,
    EnemyDefeat,
    PlayerDeath,
    EggCollect,
    EggHatch,
    Bounce,
    Pterodactyl,
    PterodactylDefeat,
    WaveStart,
    Bonus,
    ExtraLife,
    GameOver,
}

impl SoundEvent {
    /// Symbolic name the audio collaborator keys its samples by.
    pub fn name(self) -> &'static str {
        match self {
            SoundEvent::Land => "land",
            SoundEvent::EnemyDefeat => "enemy_defeat",
            SoundEvent::PlayerDeath => "player_death",
            SoundEvent::EggCollect => "egg_collect",
            SoundEvent::EggHatch => "egg_hatch",
            SoundEvent::Bounce => "bounce",
            SoundEvent::Pterodactyl => "pterodactyl",
            SoundEvent::PterodactylDefeat => "pterodactyl_defeat",
            SoundEvent::WaveStart => "wave_start",
            SoundEvent::Bonus => "bonus",
            SoundEvent::ExtraLife => "extra_life",
            SoundEvent::GameOver => "game_over",
        }
    }
}

/// Fire-and-forget audio trigger.
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

/// Discards every cue. Default sink for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl SoundSink for Silence {
    fn play(&mut self, _event: SoundEvent) {}
}

/// Queue of sound cues to be drained by the audio layer each frame.
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    events: Vec<SoundEvent>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SoundEvent> + '_ {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[SoundEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SoundSink for SoundQueue {
    fn play(&mut self, event: SoundEvent) {
        self.events.push(event);
    }
}

/// Lets the audio layer keep a handle to a sink it also hands to the arena.
impl<S: SoundSink> SoundSink for Rc<RefCell<S>> {
    fn play(&mut self, event: SoundEvent) {
        self.borrow_mut().play(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_records_in_order_and_drains() {
        let mut q = SoundQueue::new();
        q.play(SoundEvent::Land);
        q.play(SoundEvent::Bounce);
        assert_eq!(q.events(), &[SoundEvent::Land, SoundEvent::Bounce]);
        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(q.events().is_empty());
    }

    #[test]
    fn shared_queue_sees_cues_from_boxed_handle() {
        let shared = Rc::new(RefCell::new(SoundQueue::new()));
        let mut boxed: Box<dyn SoundSink> = Box::new(Rc::clone(&shared));
        boxed.play(SoundEvent::EggHatch);
        assert_eq!(shared.borrow().events(), &[SoundEvent::EggHatch]);
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(SoundEvent::PterodactylDefeat.name(), "pterodactyl_defeat");
        assert_eq!(SoundEvent::EggCollect.name(), "egg_collect");
    }
}
