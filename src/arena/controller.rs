//! Arena controller: owns every container and both tick sources, and serialises
//! ticks, gestures and submits onto one logical thread.

use super::descent::DescentSimulator;
use super::fragment::{Fragment, FragmentId, FragmentStore, Geometry, Point};
use super::loss::LossMonitor;
use super::pile::Pile;
use super::placement::{Containers, Held, Placement, PlacementController};
use super::slots::SlotSequence;
use super::spawner::{SourceGroup, Spawner};
use super::validator::{SequenceValidator, Verdict};
use std::time::{Duration, Instant};

/// Everything an arena needs, fixed for its lifetime. A new level builds a new arena.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Correct decomposition of the level's sentence; its length sizes the slot row.
    pub target: Vec<String>,
    /// Groups the spawner draws from (the current level plus any decoys).
    pub groups: Vec<SourceGroup>,
    /// Units per second.
    pub fall_speed: u32,
    pub tick_ms: u64,
    pub spawn_interval_ms: u64,
    pub columns: usize,
    pub neighborhood: usize,
    /// Fraction of the stacking room a column may fill before the arena fails.
    pub loss_ratio: f32,
    /// How long slotted fragments stay in the rejected state after a wrong submit.
    pub reject_ms: u64,
    pub geometry: Geometry,
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            target: Vec::new(),
            groups: Vec::new(),
            fall_speed: 60,
            tick_ms: 50,
            spawn_interval_ms: 4000,
            columns: 6,
            neighborhood: 1,
            loss_ratio: 0.75,
            reject_ms: 1000,
            geometry: Geometry::default(),
            seed: 0,
        }
    }
}

/// Signals raised for the UI and scoring collaborators; drained with `take_signals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Landed(FragmentId),
    /// Submit with at least one empty slot.
    NotReady,
    LevelAdvance,
    Rejected,
    ArenaFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    /// Target assembled; waiting for the next level.
    Cleared,
    Failed,
    /// Torn down by an external reset.
    Stopped,
}

/// Periodic timer. Fires at most once per poll, so a late poll is still one fixed step.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time until the next firing, if armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next.map(|due| due.saturating_duration_since(now))
    }
}

/// Read-only copy of the arena for rendering, refreshed once per frame.
#[derive(Debug, Clone)]
pub struct ArenaSnapshot {
    pub fragments: Vec<Fragment>,
    pub slots: Vec<Option<FragmentId>>,
    pub held: Option<Held>,
    pub column_heights: Vec<u32>,
    pub loss_threshold: u32,
    pub rejected: bool,
    pub can_submit: bool,
    pub phase: Phase,
    pub geometry: Geometry,
}

impl ArenaSnapshot {
    pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }
}

#[derive(Debug)]
pub struct Arena {
    config: ArenaConfig,
    store: FragmentStore,
    falling: Vec<FragmentId>,
    spawner: Spawner,
    descent: DescentSimulator,
    pile: Pile,
    slots: SlotSequence,
    placement: PlacementController,
    validator: SequenceValidator,
    loss: LossMonitor,
    descent_ticker: Ticker,
    spawn_ticker: Ticker,
    phase: Phase,
    /// Ticks left in the rejected state; slotted fragments return to the pile at zero.
    reject_ticks: u32,
    signals: Vec<Signal>,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        let geometry = config.geometry;
        Self {
            store: FragmentStore::new(),
            falling: Vec::new(),
            spawner: Spawner::new(config.groups.clone(), config.seed, &geometry),
            descent: DescentSimulator::new(config.fall_speed, config.tick_ms, &geometry),
            pile: Pile::new(config.columns, config.neighborhood, geometry),
            slots: SlotSequence::new(config.target.len()),
            placement: PlacementController::new(),
            validator: SequenceValidator::new(config.target.clone()),
            loss: LossMonitor::new(config.loss_ratio, &geometry),
            descent_ticker: Ticker::new(Duration::from_millis(config.tick_ms)),
            spawn_ticker: Ticker::new(Duration::from_millis(config.spawn_interval_ms)),
            phase: Phase::Ready,
            reject_ticks: 0,
            signals: Vec::new(),
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn geometry(&self) -> &Geometry {
        &self.config.geometry
    }

    pub fn is_rejected(&self) -> bool {
        self.reject_ticks > 0
    }

    /// A submit now would be evaluated rather than ignored.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Running && !self.is_rejected() && self.slots.is_full()
    }

    pub fn held(&self) -> Option<&Held> {
        self.placement.held()
    }

    #[cfg(test)]
    pub fn fragment(&self, id: FragmentId) -> Option<&Fragment> {
        self.store.get(id)
    }

    pub fn fragment_count(&self) -> usize {
        self.store.len()
    }

    /// Arms both tick sources and spawns the first fragment immediately.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Ready {
            return;
        }
        self.phase = Phase::Running;
        self.descent_ticker.arm(now);
        self.spawn_ticker.arm(now);
        log::info!(
            "arena started: {} slots, {} columns, step {} per {} ms, spawn every {} ms",
            self.slots.len(),
            self.pile.columns().len(),
            self.descent.step(),
            self.config.tick_ms,
            self.config.spawn_interval_ms
        );
        self.spawn_tick();
    }

    /// External reset. Tick sources are cancelled before anything else changes.
    pub fn stop(&mut self) {
        self.cancel_tickers();
        if matches!(self.phase, Phase::Ready | Phase::Running | Phase::Paused) {
            self.phase = Phase::Stopped;
            log::info!("arena stopped");
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.cancel_tickers();
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            self.descent_ticker.arm(now);
            self.spawn_ticker.arm(now);
        }
    }

    fn cancel_tickers(&mut self) {
        self.descent_ticker.cancel();
        self.spawn_ticker.cancel();
    }

    /// Fires whichever tick sources are due. Returns true if anything fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        if self.descent_ticker.poll(now) {
            self.tick();
            fired = true;
        }
        if self.spawn_ticker.poll(now) {
            self.spawn_tick();
            fired = true;
        }
        fired
    }

    /// Time until the earliest armed tick source fires.
    pub fn next_due(&self, now: Instant) -> Option<Duration> {
        match (self.descent_ticker.remaining(now), self.spawn_ticker.remaining(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// One simulation step: descent, landings, rejection countdown, loss check.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        for id in self.descent.advance(&mut self.store, &mut self.falling) {
            let x = self.store.get(id).map_or(50.0, |f| f.x);
            self.pile.land_fragment(&mut self.store, id, x);
            self.signals.push(Signal::Landed(id));
        }

        if self.reject_ticks > 0 {
            self.reject_ticks -= 1;
            if self.reject_ticks == 0 {
                self.return_slotted();
            }
        }

        if self.loss.check(&self.pile) {
            self.cancel_tickers();
            self.phase = Phase::Failed;
            self.signals.push(Signal::ArenaFailed);
            log::info!(
                "arena failed: column height {} over threshold {}",
                self.pile.max_height(),
                self.loss.threshold()
            );
        }
    }

    pub fn spawn_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if let Some(id) = self.spawner.spawn(&mut self.store) {
            self.falling.push(id);
        }
    }

    fn containers(&mut self) -> (&mut PlacementController, Containers<'_>) {
        (
            &mut self.placement,
            Containers {
                store: &mut self.store,
                pile: &mut self.pile,
                slots: &mut self.slots,
                geometry: &self.config.geometry,
            },
        )
    }

    pub fn pick_up(&mut self, point: Point) -> Option<FragmentId> {
        if self.phase != Phase::Running {
            return None;
        }
        let locked = self.is_rejected();
        let (placement, c) = self.containers();
        placement.pick_up(c, point, locked)
    }

    pub fn drag(&mut self, point: Point) {
        self.placement.drag(point);
    }

    pub fn release(&mut self, point: Point) -> Option<Placement> {
        let locked = self.is_rejected() || self.phase != Phase::Running;
        let (placement, c) = self.containers();
        let placed = placement.release(c, point, locked);
        if let Some(p) = placed {
            log::debug!("release at ({:.1}, {:.1}): {p:?}", point.x, point.y);
        }
        placed
    }

    pub fn cancel_gesture(&mut self) -> Option<FragmentId> {
        let (placement, c) = self.containers();
        placement.cancel(c)
    }

    /// Validates the slot row. Empty slots, a pending rejection, or a stopped arena
    /// make this a `NotReady` no-op.
    pub fn submit(&mut self) -> Verdict {
        let verdict = if self.phase != Phase::Running || self.is_rejected() {
            Verdict::NotReady
        } else {
            self.validator.evaluate(&self.store, &self.slots)
        };
        match verdict {
            Verdict::NotReady => self.signals.push(Signal::NotReady),
            Verdict::Match => {
                self.cancel_tickers();
                self.phase = Phase::Cleared;
                for id in self.slots.drain() {
                    self.store.remove(id);
                }
                self.signals.push(Signal::LevelAdvance);
                log::info!("sequence accepted: {}", self.validator.target().concat());
            }
            Verdict::Mismatch => {
                let ticks = self.config.reject_ms.div_ceil(self.config.tick_ms.max(1));
                self.reject_ticks = u32::try_from(ticks).unwrap_or(u32::MAX).max(1);
                self.signals.push(Signal::Rejected);
                log::info!("sequence rejected");
            }
        }
        verdict
    }

    /// Sends every slotted fragment back through the landing algorithm at its own x.
    fn return_slotted(&mut self) {
        for id in self.slots.drain() {
            let x = self.store.get(id).map_or(50.0, |f| f.x);
            self.pile.land_fragment(&mut self.store, id, x);
        }
    }

    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            fragments: self.store.iter().cloned().collect(),
            slots: self.slots.as_slice().to_vec(),
            held: self.placement.held().copied(),
            column_heights: self.pile.heights(),
            loss_threshold: self.loss.threshold(),
            rejected: self.is_rejected(),
            can_submit: self.can_submit(),
            phase: self.phase,
            geometry: self.config.geometry,
        }
    }
}
