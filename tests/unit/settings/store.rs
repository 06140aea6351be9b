use super::*;

#[test]
fn snapshot_only_changes_on_commit() {
    let mut store = SettingsStore::default();
    let before = store.snapshot();
    store.edit(|d| d.text_color = Color::rgb(1.0, 0.0, 0.0));
    assert!(store.has_pending_changes());
    assert_eq!(store.snapshot().text_color, Color::BLACK);

    let committed = store.commit().unwrap();
    assert_eq!(committed.text_color, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(before.text_color, Color::BLACK);
    assert!(!store.has_pending_changes());
}

#[test]
fn revert_discards_draft() {
    let mut store = SettingsStore::default();
    store.edit(|d| d.interval_padding = 4.0);
    store.revert();
    assert_eq!(store.draft().interval_padding, 1.0);
}

#[test]
fn invalid_draft_is_not_committed() {
    let mut store = SettingsStore::default();
    store.edit(|d| d.max_render_height = 10);
    assert!(store.commit().is_err());
    assert_eq!(store.snapshot().max_render_height, 1080);
}

#[test]
fn overrides_resolve_and_notify() {
    let mut store = SettingsStore::default();
    let rx = store.subscribe();
    let blue = Color::rgb(0.0, 0.0, 1.0);

    store.apply_override("attack", blue);
    assert_eq!(store.highlight_color_for("attack"), blue);
    assert_eq!(
        store.highlight_color_for("groom"),
        store.draft().highlight_color
    );
    store.clear_override("attack");
    store.clear_override("attack");
    store.commit().unwrap();

    let events: Vec<SettingsEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            SettingsEvent::OverrideApplied {
                category: "attack".to_owned()
            },
            SettingsEvent::OverrideCleared {
                category: "attack".to_owned()
            },
            SettingsEvent::Committed,
        ]
    );
}

#[test]
fn dropped_subscribers_are_pruned() {
    let mut store = SettingsStore::default();
    drop(store.subscribe());
    let rx = store.subscribe();
    store.reset();
    assert_eq!(rx.try_recv().unwrap(), SettingsEvent::DraftChanged);
    assert_eq!(store.subscribers.len(), 1);
}
