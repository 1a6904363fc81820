//! Where agendas and reference documents live on disk.
//!
//! Everything the engine reads or writes goes through here by logical name;
//! the rotation code only ever sees text.

use crate::config::Config;
use crate::dates::WeekDates;
use crate::error::{AgendaError, Result};
use crate::io;
use crate::paths;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Workspace {
    input_dir: PathBuf,
    output_dir: PathBuf,
    title: String,
}

impl Workspace {
    pub fn new(root: &Path, config: &Config) -> Self {
        Self {
            input_dir: root.join(&config.dirs.input),
            output_dir: root.join(&config.dirs.output),
            title: config.title.clone(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn read_input(&self, name: &str) -> Result<Option<String>> {
        io::read_if_exists(&self.input_dir.join(name))
    }

    /// Last week's agenda, the state record this run advances.
    pub fn last_agenda_path(&self, dates: &WeekDates) -> PathBuf {
        self.input_dir
            .join(paths::agenda_file_name(dates.last_week, &self.title))
    }

    /// Where next week's agenda is written for printing and distribution.
    pub fn output_agenda_path(&self, dates: &WeekDates) -> PathBuf {
        self.output_dir
            .join(paths::agenda_file_name(dates.next_week, &self.title))
    }

    /// Where next week's agenda waits for the following run.
    pub fn carried_agenda_path(&self, dates: &WeekDates) -> PathBuf {
        self.input_dir
            .join(paths::agenda_file_name(dates.next_week, &self.title))
    }

    pub fn read_last_agenda(&self, dates: &WeekDates) -> Result<String> {
        let path = self.last_agenda_path(dates);
        io::read_if_exists(&path)?.ok_or(AgendaError::MissingAgenda(path))
    }

    pub fn write_output(&self, dates: &WeekDates, text: &str) -> Result<PathBuf> {
        let path = self.output_agenda_path(dates);
        io::atomic_write(&path, text.as_bytes())?;
        Ok(path)
    }

    /// Store next week's agenda as the new state record and retire last week's.
    /// Last week's file is only removed once the new one is safely written.
    pub fn carry_forward(&self, dates: &WeekDates, text: &str) -> Result<PathBuf> {
        let path = self.carried_agenda_path(dates);
        io::atomic_write(&path, text.as_bytes())?;
        let last = self.last_agenda_path(dates);
        if last != path {
            io::remove_if_exists(&last)?;
        }
        Ok(path)
    }
}
