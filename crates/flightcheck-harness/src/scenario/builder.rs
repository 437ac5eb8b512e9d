//! Scenario builder API.

use flightcheck_core::{DecodeSession, SessionConfig};
use tracing::debug;

use crate::{
    run::ClientRun,
    scenario::{OracleFn, World},
};

struct RunSpec {
    name: String,
    exit_code: i32,
    lines: Vec<String>,
    config: SessionConfig,
}

/// Scenario builder.
///
/// Add captured runs, then call `.oracle()` to get a [`RunnableScenario`].
pub struct Scenario {
    name: String,
    runs: Vec<RunSpec>,
}

impl Scenario {
    /// Create a new scenario with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), runs: Vec::new() }
    }

    /// Add a QUIC example-client run.
    pub fn client_run(self, name: impl Into<String>, exit_code: i32, lines: impl IntoIterator<Item = String>) -> Self {
        self.client_run_with_config(name, exit_code, lines, SessionConfig::quic_crypto())
    }

    /// Add a run decoded with a custom session configuration.
    pub fn client_run_with_config(
        mut self,
        name: impl Into<String>,
        exit_code: i32,
        lines: impl IntoIterator<Item = String>,
        config: SessionConfig,
    ) -> Self {
        self.runs.push(RunSpec { name: name.into(), exit_code, lines: lines.into_iter().collect(), config });
        self
    }

    /// Set the oracle function and return a runnable scenario.
    ///
    /// The oracle is mandatory - a scenario cannot run without verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

/// A scenario with an oracle function that can be executed.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Decode every run, then invoke the oracle.
    ///
    /// A run whose log does not decode fails the scenario before the oracle
    /// sees anything.
    pub fn run(self) -> Result<(), String> {
        let name = self.scenario.name;
        let mut world = World::new();

        for spec in self.scenario.runs {
            let run = ClientRun::new(spec.exit_code, DecodeSession::new(spec.lines, spec.config));
            let signature = run
                .signature()
                .map_err(|e| format!("Scenario '{name}': run {} failed to decode: {e}", spec.name))?;
            debug!(scenario = %name, run = %spec.name, %signature, "run decoded");
            world.add_run(spec.name, run);
        }

        (self.oracle)(&world).map_err(|e| format!("Scenario '{name}': {e}"))
    }
}
