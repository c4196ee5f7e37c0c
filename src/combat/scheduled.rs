//! A timed cast: the runtime binding of one catalog entry to one source.

use std::sync::Arc;
use std::time::Duration;

use crate::combat::object::ObjectId;
use crate::spells::types::Spell;

/// Lifecycle of a scheduled cast.
///
/// The tick loop drives `NotStarted → Ready → {Successful, Failed}`. The
/// cast/channel interruption states share the same transition points and are
/// reserved for fuller cast-bar handling; nothing in the tick loop produces
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastStatus {
    NotStarted,
    Ready,
    InProgress,
    Canceled,
    ChannelInProgress,
    ChannelCanceled,
    Successful,
    Failed,
}

/// One scheduled cast. Owned by the source node's pending list from
/// scheduling until the per-tick prune removes it in a terminal status.
pub struct ScheduledSpell {
    source: ObjectId,
    spell: Arc<dyn Spell>,
    activation: Duration,
    timer: Duration,
    paused: bool,
    status: CastStatus,
}

impl ScheduledSpell {
    pub(crate) fn new(source: ObjectId, spell: Arc<dyn Spell>) -> Self {
        Self {
            source,
            spell,
            activation: Duration::ZERO,
            timer: Duration::ZERO,
            paused: false,
            status: CastStatus::NotStarted,
        }
    }

    pub fn source(&self) -> ObjectId {
        self.source
    }

    pub fn spell(&self) -> &Arc<dyn Spell> {
        &self.spell
    }

    pub fn activation(&self) -> Duration {
        self.activation
    }

    pub fn timer(&self) -> Duration {
        self.timer
    }

    pub fn status(&self) -> CastStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Shifts the activation timestamp forward. Used when an effect
    /// schedules a future cast, e.g. a damage-over-time tick.
    pub fn delay_activation(&mut self, delay: Duration) {
        self.activation += delay;
    }

    pub fn increment_timer(&mut self, delta: Duration) {
        if !self.paused {
            self.timer += delta;
        }
    }

    /// `NotStarted → Ready` once the timer reaches the activation timestamp.
    /// Readiness is `timer >= activation`; the transition fires at most once.
    pub fn update_cast_status(&mut self) {
        let timestamp_reached = self.timer >= self.activation;
        let not_started = self.status == CastStatus::NotStarted;
        if timestamp_reached && not_started {
            self.status = CastStatus::Ready;
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, CastStatus::Ready)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, CastStatus::Successful | CastStatus::Failed)
    }

    pub fn mark_successful(&mut self) {
        self.status = CastStatus::Successful;
    }

    pub fn mark_failed(&mut self) {
        self.status = CastStatus::Failed;
    }
}
