use chrono::{DateTime, Local};
use thiserror::Error;

use crate::fetcher::Unit;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FETCHING_STATUS: &str = "Fetching weather data, please wait...";

/// Input problems caught before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a valid location.")]
    EmptyLocation,
    #[error("Please select a temperature unit.")]
    NoUnit,
    #[error("A fetch is already in progress.")]
    AlreadyFetching,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching,
}

/// Validated inputs for one fetch, handed to whoever runs the request.
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub location: String,
    pub unit: Unit,
}

/// Outcome of a resolved fetch. `report` is either the service's body text or
/// the fetcher's synthesized failure text; the presenter renders both alike.
#[derive(Debug, Clone)]
pub struct CompletedFetch {
    pub location: String,
    pub report: String,
    pub finished_at: DateTime<Local>,
}

/// Owns the interactive state of one fetch cycle, independent of any UI
/// toolkit: Idle -> Fetching on a valid trigger, back to Idle on completion.
/// The display buffer and status line live here so the surface only draws.
#[derive(Debug, Default)]
pub struct Presenter {
    state: FetchState,
    status: String,
    output: String,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the form inputs and, if they pass, enters the Fetching state.
    /// Rejections leave the state untouched and must not start a request.
    pub fn trigger(&mut self, location: &str, unit: Option<Unit>) -> Result<FetchParams, InputError> {
        if self.state == FetchState::Fetching {
            return Err(InputError::AlreadyFetching);
        }

        let location = location.trim();
        if location.is_empty() {
            return Err(InputError::EmptyLocation);
        }
        let unit = unit.ok_or(InputError::NoUnit)?;

        self.state = FetchState::Fetching;
        self.status = FETCHING_STATUS.to_string();

        Ok(FetchParams {
            location: location.to_string(),
            unit,
        })
    }

    /// Returns to Idle and replaces the whole output buffer with the
    /// formatted report. Runs for failure text just like for success.
    pub fn complete(&mut self, done: &CompletedFetch) {
        self.state = FetchState::Idle;
        self.status.clear();
        self.output = format_report(&done.location, &done.report, done.finished_at);
    }

    pub fn is_fetching(&self) -> bool {
        self.state == FetchState::Fetching
    }

    pub fn trigger_enabled(&self) -> bool {
        !self.is_fetching()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Report layout shared by the output area and the saved file.
pub fn format_report(location: &str, report: &str, at: DateTime<Local>) -> String {
    format!(
        "Weather Information for {location}:\n{report}\nData fetched at: {}\n",
        at.format(TIMESTAMP_FORMAT)
    )
}
