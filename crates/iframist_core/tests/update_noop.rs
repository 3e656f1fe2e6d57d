use iframist_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn blank_submit_changes_nothing() {
    let state = AppState::new();
    for raw in ["", "   ", "\t\n "] {
        let (mut next, effects) = update(state.clone(), Msg::Submit(raw.to_string()));
        assert!(effects.is_empty());
        assert!(!next.consume_dirty());
        assert_eq!(next, state);
    }
}
