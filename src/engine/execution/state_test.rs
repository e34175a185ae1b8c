use crate::engine::execution::ExecutionState;
use crate::engine::execution::ExecutionState::*;

const ALL: [ExecutionState; 6] = [Created, Dispatching, Awaiting, Completed, Failed, TimedOut];

#[test]
fn only_documented_transitions_are_allowed() {
    let allowed = [
        (Created, Dispatching),
        (Dispatching, Awaiting),
        (Dispatching, Failed),
        (Awaiting, Completed),
        (Awaiting, TimedOut),
    ];

    for from in ALL {
        for to in ALL {
            assert_eq!(
                from.can_transition_to(to),
                allowed.contains(&(from, to)),
                "{from:?} -> {to:?}"
            );
        }
    }
}

#[test]
fn terminal_states_have_no_exits() {
    for state in ALL.into_iter().filter(ExecutionState::is_terminal) {
        assert!(ALL.iter().all(|next| !state.can_transition_to(*next)));
    }
    assert!(!Awaiting.is_terminal());
}
