#![no_std]

extern crate alloc;

pub use bomb::*;
pub use collection::*;
pub use config::*;
pub use error::*;
pub use grid::*;
pub use payoff::*;
pub use random::*;
pub use scheduler::*;
pub use snapshot::*;
pub use store::*;
pub use task::*;
pub use types::*;
pub use view::*;

mod bomb;
mod collection;
mod config;
mod error;
mod grid;
mod payoff;
mod random;
mod scheduler;
mod snapshot;
mod store;
mod task;
mod types;
mod view;
