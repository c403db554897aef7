mod log;
mod stats;
mod thc;
mod tolerance;
mod user;

pub use log::*;
pub use stats::*;
pub use thc::*;
pub use tolerance::*;
pub use user::*;

use std::ops::Deref;

/// Limit applied to users who never set their own.
pub const DEFAULT_MAX_DAILY_THC_MG: f64 = 100.0;

#[derive(Clone)]
pub struct Command {
    state: cannabot_shared::State,
    stash: cannabot_stash::Command,
    default_daily_limit: Option<f64>,
}

impl Deref for Command {
    type Target = cannabot_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: cannabot_shared::State) -> Self {
        Self {
            stash: cannabot_stash::Command::new(state.clone()),
            state,
            default_daily_limit: None,
        }
    }

    /// Daily limit used for users without one of their own. `None` disables
    /// the check for them.
    pub fn with_default_daily_limit(mut self, limit: Option<f64>) -> Self {
        self.default_daily_limit = limit.filter(|l| *l > 0.0);
        self
    }

    pub fn stash(&self) -> &cannabot_stash::Command {
        &self.stash
    }
}
