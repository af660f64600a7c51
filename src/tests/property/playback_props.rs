//! Property-based tests for the playback state machine.

use proptest::prelude::*;

use crate::core::voice::{Playback, PlaybackState, ProviderCommand, SpeakRequest, SpeechParams, UtteranceId};

#[derive(Debug, Clone, Copy)]
enum Op {
    Speak,
    Pause,
    Resume,
    Toggle,
    Stop,
    FinishActive,
    FinishStale,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Speak),
        Just(Op::Pause),
        Just(Op::Resume),
        Just(Op::Toggle),
        Just(Op::Stop),
        Just(Op::FinishActive),
        Just(Op::FinishStale),
    ]
}

fn request() -> SpeakRequest {
    SpeakRequest::new("hello", None, SpeechParams::default()).expect("non-empty text")
}

fn apply(pb: Playback, op: Op) -> Playback {
    let step = match op {
        Op::Speak => pb.speak(request()).ok(),
        Op::Pause => pb.pause().ok(),
        Op::Resume => pb.resume().ok(),
        Op::Toggle => pb.toggle_pause().ok(),
        Op::Stop => Some(pb.stop()),
        Op::FinishActive => {
            return pb.active().and_then(|id| pb.finished(id)).unwrap_or(pb);
        }
        Op::FinishStale => return pb.finished(UtteranceId(0)).unwrap_or(pb),
    };
    step.map(|s| s.playback).unwrap_or(pb)
}

proptest! {
    #[test]
    fn stop_always_ends_idle(ops in prop::collection::vec(arb_op(), 0..40)) {
        let pb = ops.into_iter().fold(Playback::new(), apply);
        let step = pb.stop();
        prop_assert_eq!(step.playback.state(), PlaybackState::Idle);
        prop_assert!(step.playback.active().is_none());
        prop_assert_eq!(step.command.is_some(), !pb.is_idle());
    }

    #[test]
    fn active_only_when_not_idle(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut pb = Playback::new();
        for op in ops {
            pb = apply(pb, op);
            prop_assert_eq!(pb.active().is_some(), !pb.is_idle());
        }
    }

    #[test]
    fn utterance_ids_increase(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut pb = Playback::new();
        let mut last = 0u64;
        for op in ops {
            if let (Op::Speak, Ok(step)) = (op, pb.speak(request())) {
                if let Some(ProviderCommand::Start { id, .. }) = &step.command {
                    prop_assert!(id.0 > last);
                    last = id.0;
                }
                pb = step.playback;
            } else {
                pb = apply(pb, op);
            }
        }
    }

    #[test]
    fn stale_finish_is_ignored(ops in prop::collection::vec(arb_op(), 0..40)) {
        let pb = ops.into_iter().fold(Playback::new(), apply);
        prop_assert!(pb.finished(UtteranceId(0)).is_none());
    }
}
