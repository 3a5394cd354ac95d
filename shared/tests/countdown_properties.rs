//! Property tests for the countdown state machine.

use aid_core::capabilities::{Coordinates, LocationError, TimerId, TimerScope};
use aid_core::countdown::{
    Countdown, CountdownConfig, CountdownPhase, SessionId, SessionOutcome, Started, TickOutcome,
    TickRequest,
};
use aid_core::error::LocationUnavailable;
use proptest::prelude::*;

fn start(countdown: &mut Countdown) -> TickRequest {
    match countdown.begin(SessionId::new(), false) {
        Ok(Started::Ticking(tick)) => tick,
        other => panic!("expected ticking, got {other:?}"),
    }
}

#[derive(Debug, Clone)]
enum Op {
    Request { locate: bool },
    Locate { ok: bool },
    Tick,
    StaleTick(u64),
    CallNow,
    Cancel,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|locate| Op::Request { locate }),
        any::<bool>().prop_map(|ok| Op::Locate { ok }),
        Just(Op::Tick),
        Just(Op::Tick),
        Just(Op::Tick),
        (1000u64..=2000u64).prop_map(Op::StaleTick),
        Just(Op::CallNow),
        Just(Op::Cancel),
    ]
}

proptest! {
    /// A session of N seconds dispatches after exactly N ticks.
    #[test]
    fn dispatches_after_exactly_n_ticks(n in 1u32..=60u32) {
        let mut countdown = Countdown::new(CountdownConfig::new(n).unwrap());
        let mut tick = start(&mut countdown);
        let mut fired = 0u32;

        loop {
            fired += 1;
            match countdown.tick(tick.id) {
                TickOutcome::Continue(next) => {
                    prop_assert_eq!(countdown.remaining_seconds(), n - fired);
                    tick = next;
                }
                TickOutcome::Expired(notice) => {
                    prop_assert_eq!(notice.ticks_elapsed, n);
                    break;
                }
                TickOutcome::Stale => prop_assert!(false, "live tick reported stale"),
            }
        }

        prop_assert_eq!(fired, n);
        prop_assert_eq!(countdown.phase(), CountdownPhase::Idle);
        prop_assert_eq!(countdown.remaining_seconds(), n);
    }

    /// Cancelling at any point before expiry means no dispatch, even if the
    /// last scheduled tick still arrives.
    #[test]
    fn cancel_prevents_dispatch(n in 1u32..=30u32, k in 0u32..30u32) {
        let k = k % n;
        let mut countdown = Countdown::new(CountdownConfig::new(n).unwrap());
        let mut tick = start(&mut countdown);

        for _ in 0..k {
            match countdown.tick(tick.id) {
                TickOutcome::Continue(next) => tick = next,
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        let cancellation = countdown.cancel().unwrap();
        prop_assert_eq!(cancellation.pending_tick, Some(tick.id));
        prop_assert_eq!(cancellation.remaining_seconds, n - k);

        prop_assert_eq!(countdown.tick(tick.id), TickOutcome::Stale);
        prop_assert_eq!(countdown.last_outcome(), Some(SessionOutcome::Cancelled));
        prop_assert_eq!(countdown.remaining_seconds(), n);
    }

    /// Call Now always lets exactly one more tick finish the session.
    #[test]
    fn call_now_expires_within_one_tick(n in 1u32..=60u32, k in 0u32..60u32) {
        let k = k % n;
        let mut countdown = Countdown::new(CountdownConfig::new(n).unwrap());
        let mut tick = start(&mut countdown);

        for _ in 0..k {
            if let TickOutcome::Continue(next) = countdown.tick(tick.id) {
                tick = next;
            }
        }

        countdown.call_now().unwrap();
        prop_assert_eq!(countdown.remaining_seconds(), 1);
        prop_assert!(matches!(countdown.tick(tick.id), TickOutcome::Expired(_)));
    }

    /// Arbitrary interleavings never dispatch twice per session, never leave
    /// more than one pending tick, and never let remaining exceed the start.
    #[test]
    fn arbitrary_ops_keep_invariants(ops in proptest::collection::vec(arb_op(), 1..=80)) {
        let n = 5;
        let mut countdown = Countdown::new(CountdownConfig::new(n).unwrap());
        let mut dispatches = 0u32;
        let mut sessions = 0u32;

        for op in ops {
            match op {
                Op::Request { locate } => {
                    if countdown.begin(SessionId::new(), locate).is_ok() {
                        sessions += 1;
                    }
                }
                Op::Locate { ok } => {
                    if let Some(session) = countdown.session() {
                        let location = if ok {
                            Ok(Coordinates::new(1.0, 2.0).unwrap())
                        } else {
                            Err(LocationUnavailable::Request(LocationError::PositionUnavailable))
                        };
                        let _ = countdown.location_resolved(session, location);
                    }
                }
                Op::Tick => {
                    if let Some(id) = countdown.pending_tick() {
                        if let TickOutcome::Expired(_) = countdown.tick(id) {
                            dispatches += 1;
                        }
                    }
                }
                Op::StaleTick(seq) => {
                    let id = TimerId::new(TimerScope::Countdown, seq);
                    prop_assert_eq!(countdown.tick(id), TickOutcome::Stale);
                }
                Op::CallNow => {
                    let _ = countdown.call_now();
                }
                Op::Cancel => {
                    let _ = countdown.cancel();
                }
            }

            prop_assert!(countdown.remaining_seconds() <= n);
            prop_assert_eq!(
                countdown.pending_tick().is_some(),
                countdown.phase() == CountdownPhase::Running
            );
        }

        prop_assert!(dispatches <= sessions);
    }
}
