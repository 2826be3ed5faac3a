//! End-to-end `interact` scenarios against hand-built `galaxy`
//! definitions, exercising the flag-0 yield path and the
//! flag-1-then-remote-exchange path without any real network.
//!
//! The definitions below all use the same combinator trick: with
//! `state = nil`, `galaxy = ap ap c cons ap ap cons 0 ap ap cons nil
//! nil` reduces `ap ap galaxy nil (ap ap cons ea eb)` to exactly `eb`
//! — so the test controls the output of one `interact` round entirely
//! through the shape of the event (and, for the second round, through
//! what the stub remote hands back), without needing real S/K/B/C
//! branching logic.

use galaxy_driver::{Engine, StubRemote};
use galaxy_engine::{load_definitions, modulate, unvectorize, View};

const FORWARDING_GALAXY: &str = "galaxy = ap ap c cons ap ap cons 0 ap ap cons nil nil\n";

#[test]
fn flag_zero_yields_state_and_images_to_the_host() {
    let env = load_definitions(FORWARDING_GALAXY).unwrap();
    let engine = Engine::from_environment(env);

    let desired = View::list([View::int(0), View::Nil, View::list([View::int(0)]), View::Nil]);
    let event = View::pair(View::Nil, desired);
    let mut remote = StubRemote::echo();

    let (new_state, images) = engine
        .interact(View::Nil, event, &mut remote)
        .expect("interact should succeed without touching the remote");

    assert_eq!(new_state, View::Nil);
    assert_eq!(images, View::list([View::int(0)]));
}

#[test]
fn flag_one_performs_exactly_one_remote_exchange_then_yields() {
    let env = load_definitions(FORWARDING_GALAXY).unwrap();
    let engine = Engine::from_environment(env);

    // First round: flag=1, newState=nil, data=nil.
    let first_tuple = View::list([View::int(1), View::Nil, View::Nil]);
    let event = View::pair(View::Nil, first_tuple);

    // The remote's reply: once this driver's combinator drops the
    // reply's first element (playing the role of `ea` on the next
    // round), what's left must be (flag=0, newState=nil, data=nil).
    let reply_view = View::list([View::Nil, View::int(0), View::Nil, View::Nil]);
    let reply_bits = modulate(&unvectorize(&reply_view)).unwrap();
    let mut remote = StubRemote::scripted(vec![reply_bits]);

    let (new_state, data) = engine
        .interact(View::Nil, event, &mut remote)
        .expect("interact should resolve after one remote round-trip");

    assert_eq!(remote.call_count(), 1);
    assert_eq!(new_state, View::Nil);
    assert_eq!(data, View::Nil);
}

#[test]
fn undefined_galaxy_is_an_error() {
    let env = load_definitions("other = 1\n").unwrap();
    let engine = Engine::from_environment(env);
    let mut remote = StubRemote::echo();
    let result = engine.interact(View::Nil, View::Nil, &mut remote);
    assert!(result.is_err());
}
