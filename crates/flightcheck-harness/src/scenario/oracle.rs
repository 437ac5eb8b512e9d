//! Reusable oracles.

use crate::{
    expect::ExpectedFlight,
    run::ClientRun,
    scenario::{OracleFn, World},
    signature::RetryPolicy,
};

fn lookup<'w>(world: &'w World, name: &str) -> Result<&'w ClientRun, String> {
    world.run(name).ok_or_else(|| format!("run {name} not found (have {})", world.run_names().join(", ")))
}

/// Every oracle must pass; the first failure is reported.
pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
    Box::new(move |world| {
        for oracle in &oracles {
            oracle(world)?;
        }
        Ok(())
    })
}

/// Run `name` exited with status 0.
pub fn exit_success(name: impl Into<String>) -> OracleFn {
    let name = name.into();
    Box::new(move |world| lookup(world, &name)?.assert_success().map_err(|e| format!("run {name}: {e}")))
}

/// Every run in the world exited with status 0.
pub fn all_exit_success() -> OracleFn {
    Box::new(|world| {
        for (name, run) in world.runs() {
            run.assert_success().map_err(|e| format!("run {name}: {e}"))?;
        }
        Ok(())
    })
}

/// Run `name` starts with `expected`.
pub fn flight_matches(name: impl Into<String>, expected: ExpectedFlight, policy: RetryPolicy) -> OracleFn {
    let name = name.into();
    Box::new(move |world| {
        lookup(world, &name)?.assert_flight(&expected, policy).map_err(|e| format!("run {name}: {e}"))
    })
}

/// Run `name` decoded to exactly `count` messages.
pub fn message_count(name: impl Into<String>, count: usize) -> OracleFn {
    let name = name.into();
    Box::new(move |world| {
        let actual = lookup(world, &name)?.handshake().map_err(|e| format!("run {name}: {e}"))?.len();
        if actual == count {
            Ok(())
        } else {
            Err(format!("run {name}: expected {count} handshake messages, got {actual}"))
        }
    })
}

/// Run `name` did not report refused early data.
pub fn no_early_data_rejection(name: impl Into<String>) -> OracleFn {
    let name = name.into();
    Box::new(move |world| {
        if lookup(world, &name)?.early_data_rejected() {
            Err(format!("run {name}: server rejected early data"))
        } else {
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use flightcheck_core::SessionConfig;

    use super::*;
    use crate::fixture::{LogBuilder, server_flight};

    fn world() -> World {
        let mut world = World::new();
        for (name, exit_code) in [("fresh", 0), ("resumed", 1)] {
            let log = LogBuilder::new().crypto_data("Initial", &server_flight(&[2, 8, 20]));
            world.add_run(name.to_owned(), ClientRun::new(exit_code, log.session(SessionConfig::quic_crypto())));
        }
        world
    }

    #[test]
    fn all_exit_success_names_failing_run() {
        let err = all_exit_success()(&world()).unwrap_err();
        assert_eq!(err, "run resumed: client exited with status 1");
    }

    #[test]
    fn unknown_run_lists_known_names() {
        let err = exit_success("retry")(&world()).unwrap_err();
        assert_eq!(err, "run retry not found (have fresh, resumed)");
    }

    #[test]
    fn message_count_checks_decoded_length() {
        assert!(message_count("fresh", 3)(&world()).is_ok());
        assert_eq!(
            message_count("fresh", 4)(&world()).unwrap_err(),
            "run fresh: expected 4 handshake messages, got 3"
        );
    }
}
