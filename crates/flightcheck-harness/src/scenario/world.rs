//! Decoded runs of a scenario.

use crate::run::ClientRun;

/// Named client runs, in the order the scenario declared them.
#[derive(Debug, Default)]
pub struct World {
    runs: Vec<(String, ClientRun)>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run under `name`.
    pub fn add_run(&mut self, name: String, run: ClientRun) {
        self.runs.push((name, run));
    }

    /// Run registered under `name`.
    pub fn run(&self, name: &str) -> Option<&ClientRun> {
        self.runs.iter().find(|(n, _)| n == name).map(|(_, run)| run)
    }

    /// Run names, in declaration order.
    pub fn run_names(&self) -> Vec<&str> {
        self.runs.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Runs with their names, in declaration order.
    pub fn runs(&self) -> impl Iterator<Item = (&str, &ClientRun)> {
        self.runs.iter().map(|(name, run)| (name.as_str(), run))
    }
}
