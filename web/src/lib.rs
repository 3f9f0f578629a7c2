use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bret_core::{
    BombTask, Cell, RoundRecord, RoundView, SeededRandom, TaskConfig, TickOutcome,
};
use clap::Parser;
use wasm_bindgen::prelude::*;

mod storage;
mod timer;
mod utils;

pub use storage::BrowserSessionStore;
pub use timer::IntervalScheduler;

type BrowserTask = BombTask<BrowserSessionStore, IntervalScheduler>;

#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    /// Arguments come from the page's location hash, e.g. `#-vv&--seed=42`.
    fn from_location() -> Result<Self, clap::Error> {
        let location_hash = web_sys::window()
            .and_then(|window| window.location().hash().ok())
            .unwrap_or_default();
        Self::try_parse_from(location_hash.split(['#', '&']))
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let (args, parse_error) = match Args::from_location() {
        Ok(args) => (args, None),
        Err(err) => (Args::default(), Some(err)),
    };
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            gloo::console::error!(format!("Error initializing logger: {err}"));
        }
    }
    if let Some(err) = parse_error {
        log::warn!("Ignoring location hash arguments: {}", err);
    }
    log::debug!("seed: {:?}", args.seed);
}

/// One task round bound to the page: session storage for persistence, `setInterval` for automatic reveals.
#[wasm_bindgen]
pub struct BombTaskHandle {
    task: Rc<RefCell<BrowserTask>>,
    listener: Rc<RefCell<Option<js_sys::Function>>>,
    rng: SeededRandom,
}

fn notify(listener: &RefCell<Option<js_sys::Function>>) {
    if let Some(callback) = listener.borrow().as_ref() {
        if let Err(err) = callback.call0(&JsValue::NULL) {
            log::error!("Round listener failed: {:?}", err);
        }
    }
}

#[wasm_bindgen]
impl BombTaskHandle {
    /// Builds the round from a JSON settings object, resuming a round persisted earlier in this tab.
    pub fn mount(settings_json: &str) -> Result<BombTaskHandle, JsError> {
        let config = TaskConfig::from_json(settings_json)?;
        let seed = Args::from_location()
            .ok()
            .and_then(|args| args.seed)
            .unwrap_or_else(utils::js_random_seed);
        log::debug!("Mounting round with seed {}: {:?}", seed, config);
        let mut rng = SeededRandom::new(seed);

        let listener: Rc<RefCell<Option<js_sys::Function>>> = Rc::default();
        // filled in once the task exists, intervals only fire after this returns
        let slot: Rc<RefCell<Weak<RefCell<BrowserTask>>>> = Rc::default();
        let on_tick: Rc<dyn Fn()> = {
            let slot = slot.clone();
            let listener = listener.clone();
            Rc::new(move || {
                let Some(task) = slot.borrow().upgrade() else {
                    return;
                };
                let outcome = task.borrow_mut().tick();
                if outcome.has_update() {
                    if let TickOutcome::Exhausted(cell) = outcome {
                        log::debug!("Last card {} revealed", cell);
                    }
                    notify(&listener);
                }
            })
        };

        let task = BombTask::new(
            config,
            BrowserSessionStore::new(),
            IntervalScheduler::new(on_tick),
            &mut rng,
        )?;
        let task = Rc::new(RefCell::new(task));
        *slot.borrow_mut() = Rc::downgrade(&task);

        Ok(Self {
            task,
            listener,
            rng,
        })
    }

    /// Called with no arguments after every automatic reveal.
    pub fn set_listener(&self, callback: Option<js_sys::Function>) {
        *self.listener.borrow_mut() = callback;
    }

    pub fn start(&self) {
        self.task.borrow_mut().start();
    }

    pub fn stop(&self) {
        self.task.borrow_mut().stop();
    }

    pub fn resolve(&self) {
        self.task.borrow_mut().resolve();
    }

    /// Click on a card. Returns whether the collection changed; disabled cards are left alone.
    pub fn toggle(&self, row: u32, col: u32, active: bool) -> Result<bool, JsError> {
        let mut task = self.task.borrow_mut();
        let cell = task.grid().lookup(row, col)?;
        if !task.can_toggle(cell) {
            log::debug!("Card {} is disabled", cell);
            return Ok(false);
        }
        Ok(task.toggle(cell, active).has_update())
    }

    /// Numeric input: holds the first `raw` cards, or all of them if `raw` isn't a number.
    pub fn select(&self, raw: &str) {
        self.task.borrow_mut().select_from_input(raw);
    }

    pub fn reset(&mut self) -> Result<(), JsError> {
        self.task.borrow_mut().reset(&mut self.rng)?;
        Ok(())
    }

    pub fn is_active(&self, row: u32, col: u32) -> bool {
        let task = self.task.borrow();
        task.grid()
            .lookup(row, col)
            .is_ok_and(|cell: Cell| task.collection().contains(cell))
    }

    /// [`RoundView`] as JSON.
    pub fn view(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&RoundView::from_task(&*self.task.borrow()))?)
    }

    /// [`RoundRecord`] as JSON, for the results form.
    pub fn record(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&RoundRecord::from_task(&*self.task.borrow()))?)
    }
}
