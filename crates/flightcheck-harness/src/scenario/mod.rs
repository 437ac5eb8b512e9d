//! Scenario tests over captured client runs.
//!
//! A scenario names one or more captured runs, decodes them all, and hands
//! the resulting [`World`] to an oracle. The oracle is mandatory: a
//! [`Scenario`] has no `run` method until [`Scenario::oracle`] turns it into a
//! [`RunnableScenario`].
//!
//! ```text
//! Scenario::new(..).client_run(..).client_run(..)
//!        │
//!        ▼ .oracle(..)
//! RunnableScenario ──run──> decode every run ──> World ──> oracle(&World)
//! ```

mod builder;
pub mod oracle;
mod world;

pub use builder::{RunnableScenario, Scenario};
pub use world::World;

/// Verification over the decoded world.
pub type OracleFn = Box<dyn Fn(&World) -> Result<(), String>>;
