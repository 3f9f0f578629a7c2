use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Pending,
    Running,
    Stopped,
    Resolved,
}

impl RoundPhase {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Stopped | Self::Resolved)
    }
}

impl Default for RoundPhase {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to reveal: the round isn't running on a timer or the order is used up.
    Idle,
    Revealed(Cell),
    /// Revealed the last card of the order, the round has stopped.
    Exhausted(Cell),
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// One round of the bomb risk elicitation task.
///
/// Every operation that changes the round saves a [`PersistedSnapshot`] right away, and building a task picks up a
/// snapshot left by an earlier page load.
#[derive(Debug)]
pub struct BombTask<S, T> {
    config: TaskConfig,
    grid: Grid,
    order: IterationOrder,
    bomb: Cell,
    collection: Collection,
    revealed: Array2<bool>,
    phase: RoundPhase,
    cursor: usize,
    input_value: CellCount,
    timer: Option<TimerHandle>,
    scheduler: T,
    gateway: PersistenceGateway<S>,
}

/// Grid, iteration order and bomb of a fresh round, drawn in that order.
fn generate<R>(config: &TaskConfig, rng: &mut R) -> Result<(GridLayout, Cell)>
where
    R: RandomSource + ?Sized,
{
    let randomized = config.random && config.uses_iteration_order();
    let layout = Grid::build(config.rows, config.cols, randomized, rng)?;
    let bomb = place_bomb(&layout.grid, rng);
    Ok((layout, bomb))
}

impl<S: SessionStore, T: Scheduler> BombTask<S, T> {
    pub fn new<R>(config: TaskConfig, store: S, scheduler: T, rng: &mut R) -> Result<Self>
    where
        R: RandomSource + ?Sized,
    {
        config.validate()?;
        let (GridLayout { grid, iteration_order }, bomb) = generate(&config, rng)?;
        let mut task = Self {
            collection: Collection::new(&grid),
            revealed: Array2::default(grid.nd_shape()),
            config,
            grid,
            order: iteration_order,
            bomb,
            phase: RoundPhase::Pending,
            cursor: 0,
            input_value: 0,
            timer: None,
            scheduler,
            gateway: PersistenceGateway::new(store),
        };
        task.initialize();
        Ok(task)
    }

    fn initialize(&mut self) {
        if self.config.reset_on_load {
            log::debug!("Discarding persisted round on load");
            self.gateway.reset();
        } else if let Some(snapshot) = self.gateway.load() {
            match snapshot.reconstruct(&self.grid) {
                Ok(state) => self.resume(state),
                Err(err) => {
                    log::warn!("Persisted round doesn't fit this grid, starting fresh: {}", err);
                    self.gateway.reset();
                }
            }
        }

        if !self.config.dynamic && self.phase == RoundPhase::Pending {
            self.start();
        }
    }

    /// Replays a reconstructed round: collection first, then the started, stopped and resolved steps in that order.
    fn resume(&mut self, state: ReconstructedState) {
        log::debug!(
            "Resuming round: {} collected, cursor {}, started={} stopped={} resolved={}",
            state.collection.len(),
            state.cursor,
            state.started,
            state.stopped,
            state.resolved
        );
        self.bomb = state.bomb;
        if let Some(order) = state.iteration_order {
            self.order = order;
        }
        self.cursor = state.cursor;
        self.input_value = state.input_value;

        for cell in state.collection {
            self.toggle(cell, true);
        }
        if state.started {
            self.start_from(state.cursor);
        }
        if state.stopped {
            self.stop();
        }
        if state.resolved {
            self.resolve();
        }
    }

    /// Deletes the persisted round and deals a completely new one: new iteration order, new bomb.
    pub fn reset<R>(&mut self, rng: &mut R) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        let (GridLayout { grid, iteration_order }, bomb) = generate(&self.config, rng)?;
        self.cancel_timer();
        self.gateway.reset();

        self.collection = Collection::new(&grid);
        self.revealed = Array2::default(grid.nd_shape());
        self.grid = grid;
        self.order = iteration_order;
        self.bomb = bomb;
        self.phase = RoundPhase::Pending;
        self.cursor = 0;
        self.input_value = 0;
        log::debug!("Round reset");

        if !self.config.dynamic {
            self.start();
        }
        Ok(())
    }

    /// Starts the round, continuing automatic reveals from the current cursor: after a `stop` only the cards not yet
    /// revealed are scheduled. Use [`BombTask::start_from`] to pick the index explicitly.
    pub fn start(&mut self) {
        self.start_from(self.cursor);
    }

    /// Starts the round with automatic reveals continuing at `resume_index` of the iteration order, so a resumed
    /// round only schedules the reveals that haven't happened yet.
    pub fn start_from(&mut self, resume_index: usize) {
        match self.phase {
            RoundPhase::Pending | RoundPhase::Stopped => {
                log::debug!("Round started at {}", resume_index);
                self.phase = RoundPhase::Running;
                if self.config.dynamic {
                    self.schedule_reveals(resume_index);
                }
            }
            RoundPhase::Running => log::debug!("Round already running"),
            RoundPhase::Resolved => log::debug!("Round already resolved, not starting"),
        }
        self.persist();
    }

    fn schedule_reveals(&mut self, resume_index: usize) {
        self.cancel_timer();
        self.cursor = resume_index.min(self.order.len());
        let remaining = self.order.len() - self.cursor;
        if remaining == 0 {
            self.stop();
        } else {
            self.timer = Some(self.scheduler.schedule(self.config.period(), remaining));
        }
    }

    /// Timer callback: reveals the next card of the iteration order.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_running() || self.timer.is_none() {
            log::trace!("Tick ignored in {:?}", self.phase);
            return TickOutcome::Idle;
        }
        let Some(cell) = self.order.get(self.cursor) else {
            return TickOutcome::Idle;
        };

        self.collection.toggle(cell, true);
        self.cursor += 1;
        log::trace!("Tick revealed {} ({}/{})", cell, self.cursor, self.order.len());

        if self.cursor == self.order.len() {
            self.stop();
            TickOutcome::Exhausted(cell)
        } else {
            self.persist();
            TickOutcome::Revealed(cell)
        }
    }

    /// Stops the round and cancels automatic reveals. Without feedback the round is resolved at once, with nothing
    /// turned over.
    pub fn stop(&mut self) {
        self.cancel_timer();
        if matches!(self.phase, RoundPhase::Pending | RoundPhase::Running) {
            log::debug!("Round stopped");
            if !self.config.feedback {
                self.resolve();
                return;
            }
            self.phase = RoundPhase::Stopped;
        }
        self.persist();
    }

    /// Finishes the round, turning over every collected card when the player gets feedback.
    pub fn resolve(&mut self) {
        self.cancel_timer();
        if self.config.feedback {
            for &cell in self.collection.cells() {
                self.revealed[cell.to_nd_index()] = true;
            }
        }
        if self.phase != RoundPhase::Resolved {
            log::debug!("Round resolved, bomb collected: {}", self.has_bomb());
            self.phase = RoundPhase::Resolved;
        }
        self.persist();
    }

    /// Picks up or puts back a single card. Phase rules are left to the caller, see [`BombTask::can_toggle`].
    pub fn toggle(&mut self, cell: Cell, active: bool) -> ToggleOutcome {
        let outcome = if self.grid.contains(cell) {
            self.collection.toggle(cell, active)
        } else {
            log::warn!("Ignoring toggle outside the grid: {}", cell);
            ToggleOutcome::NoChange
        };
        log::trace!("Toggle {} to {}: {:?}", cell, active, outcome);
        self.persist();
        outcome
    }

    pub fn toggle_at(&mut self, row: u32, col: u32, active: bool) -> Result<ToggleOutcome> {
        let cell = self.grid.lookup(row, col)?;
        Ok(self.toggle(cell, active))
    }

    /// Holds exactly the first `count` cards of the iteration order, clamped to the grid. `None`, an input that isn't
    /// a number, selects every card.
    pub fn select_up_to(&mut self, count: Option<i64>) {
        let total = self.grid.total_cells();
        // clamped into 0..=total first
        let count = count.map_or(total, |count| count.clamp(0, total.into()) as CellCount);
        self.input_value = count;

        for (index, cell) in self.order.iter().enumerate() {
            self.collection.toggle(cell, index < usize::from(count));
        }
        log::trace!("Selected {} of {}", count, total);
        self.persist();
    }

    /// [`BombTask::select_up_to`] for raw text from an input field.
    pub fn select_from_input(&mut self, raw: &str) {
        self.select_up_to(parse_count(raw));
    }

    /// Whether the player may click `cell` right now: only while running by hand, and without undo only to pick up.
    pub fn can_toggle(&self, cell: Cell) -> bool {
        if !self.grid.contains(cell)
            || !self.phase.is_running()
            || self.config.dynamic
            || self.config.input_mode
        {
            return false;
        }
        self.config.undoable || !self.collection.contains(cell)
    }

    pub fn snapshot(&self) -> PersistedSnapshot {
        let keeps_order = self.config.uses_iteration_order();
        PersistedSnapshot {
            bomb: self.bomb,
            started: self.phase != RoundPhase::Pending,
            stopped: self.phase.is_finished(),
            resolved: self.phase == RoundPhase::Resolved,
            collection: self.collection.cells().to_vec(),
            input_value: self.input_value,
            iterator: keeps_order.then(|| self.order.as_slice().to_vec()),
            iterator_cursor: keeps_order.then_some(self.cursor),
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        self.gateway.save(&snapshot);
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            log::trace!("Cancel timer {:?}", handle);
            self.scheduler.cancel(handle);
        }
    }
}

impl<S, T> BombTask<S, T> {
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bomb(&self) -> Cell {
        self.bomb
    }

    pub fn iteration_order(&self) -> &IterationOrder {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn has_bomb(&self) -> bool {
        self.collection.has_bomb(self.bomb)
    }

    pub fn collected_count(&self) -> CellCount {
        self.collection.count()
    }

    pub fn remaining_count(&self) -> CellCount {
        self.collection.remaining(self.grid.total_cells())
    }

    pub fn input_value(&self) -> CellCount {
        self.input_value
    }

    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.revealed
            .get(cell.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }
}

/// Reads a card count the way a number input does: integers as they are, decimals truncated, anything else `None`.
fn parse_count(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| value as i64)
    })
}
