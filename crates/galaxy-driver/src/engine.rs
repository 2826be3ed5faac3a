//! The interaction driver: the thin state machine that repeatedly
//! applies `galaxy` to a state and event view, following the
//! `flag`-driven remote exchange loop until the program yields
//! control back to the host.

use std::fs;
use std::path::Path;

use galaxy_engine::{demodulate, modulate, unparse, unvectorize, vectorize, Environment, Expr};

use crate::error::DriverError;
use crate::remote::Remote;

/// A loaded set of Galaxy definitions, ready to drive interactions.
///
/// Owns no mutable state beyond the definitions themselves; every
/// `interact` call is independent and reentrant, matching the spec's
/// "owns no mutable state beyond the current view" contract (the
/// *current view* is the caller's, threaded through return values, not
/// held here).
pub struct Engine {
    env: Environment,
}

impl Engine {
    /// Loads a `name = tokens...` definitions file from disk.
    pub fn new(defs_path: impl AsRef<Path>) -> Result<Engine, DriverError> {
        let source = fs::read_to_string(defs_path.as_ref())?;
        let env = galaxy_engine::load_definitions(&source)?;
        Ok(Engine { env })
    }

    /// Builds an engine directly from an already-loaded environment —
    /// useful for tests that hand-construct a minimal `galaxy`
    /// definition rather than reading one from disk.
    pub fn from_environment(env: Environment) -> Engine {
        Engine { env }
    }

    /// Runs one full `interact` round: applies `galaxy` to `state` and
    /// `event`, following any number of remote exchanges the program
    /// requests, and returns the next state and the images to render.
    pub fn interact(
        &self,
        state: galaxy_engine::View,
        event: galaxy_engine::View,
        remote: &mut dyn Remote,
    ) -> Result<(galaxy_engine::View, galaxy_engine::View), DriverError> {
        let mut current_event = event;
        let mut current_state = state;

        loop {
            let galaxy = self
                .env
                .get("galaxy")
                .ok_or_else(|| DriverError::Reducer(undefined_galaxy()))?
                .clone();
            let expr: Expr = galaxy_engine::expr::app(
                galaxy_engine::expr::app(galaxy, unvectorize(&current_state)),
                unvectorize(&current_event),
            );

            let result = galaxy_engine::evaluate(&self.env, &expr)?;
            assert_modulatable(&result)?;

            let (flag, new_state, data) = split_result(&result)?;

            if flag == 0 {
                log::info!("interact: flag=0, yielding to host");
                return Ok((new_state, data));
            }

            log::info!(
                "interact: flag=1, exchanging {} bytes with remote",
                modulate(&unvectorize(&data))?.len()
            );
            let request_bits = modulate(&unvectorize(&data))?;
            let response_bits = remote.exchange(&request_bits)?;
            let reply = demodulate(&response_bits)?;

            current_state = new_state;
            current_event = vectorize(&reply);
        }
    }
}

fn undefined_galaxy() -> galaxy_engine::ReducerError {
    galaxy_engine::ReducerError::UndefinedAtom("galaxy".to_string())
}

/// Spec step 3: `unparse(r) == unparse(demodulate(modulate(r)))`,
/// guaranteeing `r` is a plain value tree before it is vectorized.
fn assert_modulatable(result: &Expr) -> Result<(), DriverError> {
    let bits = modulate(result)?;
    let roundtripped = demodulate(&bits)?;
    if unparse(result) != unparse(&roundtripped) {
        return Err(DriverError::InvariantViolation(
            "galaxy's result did not round-trip through modulation".to_string(),
        ));
    }
    Ok(())
}

/// Spec step 4: `vectorize(r)` into `(flag, (newState, (data, _)))`.
///
/// Peels three elements off the view's cons spine rather than
/// assuming a particular [`View`] shape for the tail: `vectorize`
/// produces a flat [`View::List`] when the spine ends in `nil` and a
/// nested [`View::Pair`] chain otherwise, and the driver's own tuple
/// of `(flag, newState, data, ...)` may end either way depending on
/// what the Galaxy program leaves in the trailing slot.
fn split_result(
    result: &Expr,
) -> Result<(i64, galaxy_engine::View, galaxy_engine::View), DriverError> {
    use galaxy_engine::View;

    let view = vectorize(result);
    let (flag_view, rest) = view.uncons().ok_or_else(|| {
        DriverError::InvariantViolation("galaxy's result is not a (flag, ...) tuple".to_string())
    })?;
    let flag = match flag_view {
        View::Int(n) => i64::try_from(n.clone()).map_err(|_| {
            DriverError::InvariantViolation("flag does not fit in an i64".to_string())
        })?,
        _ => {
            return Err(DriverError::InvariantViolation(
                "flag is not an integer".to_string(),
            ))
        }
    };
    let (new_state, rest) = rest.uncons().ok_or_else(|| {
        DriverError::InvariantViolation("galaxy's result is missing newState".to_string())
    })?;
    let (data, _unused) = rest.uncons().ok_or_else(|| {
        DriverError::InvariantViolation("galaxy's result is missing data".to_string())
    })?;
    Ok((flag, new_state.clone(), data.clone()))
}
