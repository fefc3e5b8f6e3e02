//! Shooting sequence bookkeeping.

use serde::Serialize;

use crate::config::units::{Milliseconds, Steps};
use crate::config::ShootingSettings;
use crate::time::Instant;

/// Sub-phase of a photo cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShootingStage {
    /// Waiting for the carriage to reach the next photo position.
    Advancing,
    /// Vibration settle before focusing.
    PreShootDelay,
    /// Focus line asserted.
    Focusing,
    /// Shutter line asserted.
    Releasing,
    /// Hold after the exposure before moving on.
    PostShootDelay,
}

/// Progress of the current photo sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShootingProgress {
    /// Photos taken so far.
    pub photos_taken: u16,
    /// Photos requested.
    pub total_photos: u16,
    /// Current stage.
    pub stage: ShootingStage,
}

/// In-flight photo sequence. Settings are frozen for its lifetime.
#[derive(Debug, Clone)]
pub(crate) struct ShootingRun {
    pub settings: ShootingSettings,
    pub progress: ShootingProgress,
    pub stage_started: Instant,
    pub start_position: Steps,
    pub return_to_start: bool,
}

impl ShootingRun {
    pub fn new(
        settings: ShootingSettings,
        now: Instant,
        start_position: Steps,
        return_to_start: bool,
    ) -> Self {
        Self {
            settings,
            progress: ShootingProgress {
                photos_taken: 0,
                total_photos: settings.photos,
                stage: ShootingStage::Advancing,
            },
            stage_started: now,
            start_position,
            return_to_start,
        }
    }

    /// Move to `stage`, restarting the stage timer.
    pub fn enter(&mut self, stage: ShootingStage, now: Instant) {
        self.progress.stage = stage;
        self.stage_started = now;
    }

    /// Whether the current stage has lasted at least `hold`.
    pub fn stage_elapsed(&self, now: Instant, hold: Milliseconds) -> bool {
        now.has_elapsed(self.stage_started, hold.to_duration())
    }

    pub fn is_complete(&self) -> bool {
        self.progress.photos_taken >= self.settings.photos
    }
}
