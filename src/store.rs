use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::model::{Habit, System};

/// Habits and systems exported by the host application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default, rename = "system")]
    pub systems: Vec<System>,
    #[serde(default, rename = "habit")]
    pub habits: Vec<Habit>,
}

impl Snapshot {
    pub fn from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading snapshot from '{}'", path.display());

        let content = fs::read_to_string(path)?;
        content.parse::<Snapshot>().map_err(|err| {
            let msg = format!(
                "{} (in '{}')",
                err.message.as_deref().unwrap_or_default(),
                path.display()
            );
            err.with_msg(&msg)
        })
    }

    /// All habits, loose ones first, then those grouped in systems.
    pub fn all_habits(&self) -> impl Iterator<Item = &Habit> {
        self.habits
            .iter()
            .chain(self.systems.iter().flat_map(|system| system.habits.iter()))
    }

    pub fn habit(&self, key: &str) -> Result<&Habit> {
        self.all_habits().find(|habit| habit.matches(key)).ok_or_else(|| {
            Error::new(ErrorKind::UnknownHabit, &format!("no habit named '{}'", key))
        })
    }

    pub fn system_of(&self, habit: &Habit) -> Option<&System> {
        self.systems
            .iter()
            .find(|system| system.habits.iter().any(|h| h.id == habit.id))
    }
}

impl FromStr for Snapshot {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
