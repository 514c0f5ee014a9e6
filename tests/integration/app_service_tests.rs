//! Integration tests for the FeederService command and poll pipeline.
//!
//! These run on the host and verify that commands flow from the service
//! down to the dispenser port and back out as events and notifications.

use super::mock_hw::{MockFeeder, MockStore, RecordingSink, at};

use pawfeeder::app::commands::AppCommand;
use pawfeeder::app::events::{AppEvent, ScheduleChange};
use pawfeeder::app::ports::DispenseError;
use pawfeeder::app::service::FeederService;
use pawfeeder::config::FeederConfig;
use pawfeeder::error::Error;
use pawfeeder::history::FeedTrigger;
use pawfeeder::notifications::{NotificationId, NotificationKind};
use pawfeeder::schedule::{DaySet, ScheduleBook, ScheduleDraft, ScheduleId, TimeOfDay};
use pawfeeder::settings::FeederSettings;
use pawfeeder::status::FoodLevel;

fn make_app() -> (FeederService, MockFeeder, RecordingSink) {
    let mut app = FeederService::new(FeederConfig::default(), FeederSettings::default());
    let hw = MockFeeder::new();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, hw, sink)
}

fn t(h: u8, m: u8) -> TimeOfDay {
    TimeOfDay::new(h, m).unwrap()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_reports_default_schedules() {
    let (app, _hw, sink) = make_app();
    assert!(matches!(
        sink.events[0],
        AppEvent::Started {
            schedules: 3,
            active: 2
        }
    ));
    assert_eq!(app.schedules().len(), 3);
    assert!(app.status().last_fed.is_none());
}

// ── Feeding ───────────────────────────────────────────────────

#[test]
fn feed_now_dispenses_and_records_history() {
    let (mut app, mut hw, mut sink) = make_app();
    let mut store = MockStore::new();

    app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(hw.dispensed, vec![40]);
    assert_eq!(app.status().last_fed, Some(at(9, 0, 0)));
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::Dispensed {
            grams: 40,
            trigger: FeedTrigger::Manual
        })
    ));

    assert_eq!(app.persist_history(&mut store), 1);
    assert_eq!(app.persist_history(&mut store), 0);
    let history = app.feed_history(&store);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].grams, 40);
}

#[test]
fn out_of_range_feed_is_rejected_without_side_effects() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();

    let err = app
        .handle_command(AppCommand::FeedNow { grams: 5 }, at(9, 0, 0), &mut hw, &mut sink)
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.to_string(), "validation: amount 5g must be 10-200g");
    assert_eq!(hw.attempts, 0);
    assert!(sink.events.is_empty());
    assert!(app.status().last_fed.is_none());
}

#[test]
fn jam_notification_respects_preference() {
    let settings = FeederSettings {
        notifications: pawfeeder::notifications::NotificationPrefs {
            feeder_jam: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut app = FeederService::new(FeederConfig::default(), settings);
    let mut hw = MockFeeder::new();
    let mut sink = RecordingSink::new();
    hw.fail_next(DispenseError::Jammed, 1);

    let err = app
        .handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink)
        .unwrap_err();

    assert_eq!(err, Error::Dispense(DispenseError::Jammed));
    assert_eq!(app.unread_count(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::DispenseFailed { .. })),
        1
    );
}

#[test]
fn empty_hopper_posts_low_food_warning() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.fail_next(DispenseError::HopperEmpty, 1);

    assert!(
        app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink)
            .is_err()
    );
    let list = app.notifications().newest_first();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].kind, NotificationKind::Warning);
    assert_eq!(list[0].message, "Low food level detected. Refill soon.");
}

#[test]
fn removed_schedule_feed_is_skipped() {
    let (mut app, mut hw, mut sink) = make_app();
    let occ = app.next_feed(at(7, 0, 0)).unwrap();
    assert_eq!(occ.schedule, ScheduleId(1));

    app.handle_command(AppCommand::DeleteSchedule(ScheduleId(1)), at(7, 30, 0), &mut hw, &mut sink)
        .unwrap();
    app.handle_command(AppCommand::ScheduledFeed(occ), at(8, 0, 30), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(hw.attempts, 0);
}

#[test]
fn scheduled_feed_uses_current_quantity_and_confirms() {
    let (mut app, mut hw, mut sink) = make_app();
    let occ = app.next_feed(at(17, 0, 0)).unwrap();
    assert_eq!(occ.quantity, 60);

    app.handle_command(
        AppCommand::UpdateSchedule {
            id: occ.schedule,
            draft: ScheduleDraft::daily(t(18, 0), 70),
        },
        at(17, 30, 0),
        &mut hw,
        &mut sink,
    )
    .unwrap();
    app.handle_command(AppCommand::ScheduledFeed(occ), at(18, 0, 30), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(hw.dispensed, vec![70]);
    let list = app.notifications().newest_first();
    assert_eq!(
        list[0].message,
        "Scheduled feed at 6:00 PM completed successfully (70g)."
    );
    assert_eq!(list[0].kind, NotificationKind::Info);
}

// ── Schedule CRUD ─────────────────────────────────────────────

#[test]
fn schedule_commands_emit_changes() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();
    let now = at(9, 0, 0);

    app.handle_command(
        AppCommand::AddSchedule(ScheduleDraft::daily(t(10, 0), 30)),
        now,
        &mut hw,
        &mut sink,
    )
    .unwrap();
    let next = app.next_feed(now).unwrap();
    assert_eq!(next.schedule, ScheduleId(4));
    assert_eq!(next.at, at(10, 0, 0));

    app.handle_command(AppCommand::ToggleSchedule(ScheduleId(4)), now, &mut hw, &mut sink)
        .unwrap();
    assert_eq!(app.next_feed(now).unwrap().schedule, ScheduleId(2));

    app.handle_command(AppCommand::DeleteSchedule(ScheduleId(4)), now, &mut hw, &mut sink)
        .unwrap();

    let changes: Vec<ScheduleChange> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ScheduleChanged { change, .. } => Some(*change),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        [
            ScheduleChange::Added,
            ScheduleChange::Disabled,
            ScheduleChange::Removed
        ]
    );
}

#[test]
fn invalid_schedule_draft_is_rejected() {
    let (mut app, mut hw, mut sink) = make_app();
    let err = app
        .handle_command(
            AppCommand::AddSchedule(ScheduleDraft::on_days(t(10, 0), 30, DaySet::EMPTY)),
            at(9, 0, 0),
            &mut hw,
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(app.schedules().len(), 3);
}

#[test]
fn unknown_schedule_is_not_found() {
    let (mut app, mut hw, mut sink) = make_app();
    let err = app
        .handle_command(AppCommand::ToggleSchedule(ScheduleId(99)), at(9, 0, 0), &mut hw, &mut sink)
        .unwrap_err();
    assert_eq!(err, Error::ScheduleNotFound(ScheduleId(99)));
}

// ── Polling ───────────────────────────────────────────────────

#[test]
fn low_food_warning_posts_once_per_transition() {
    let (mut app, mut hw, mut sink) = make_app();
    app.tick(at(9, 0, 0), &mut hw, &mut sink);
    assert_eq!(app.unread_count(), 0);

    hw.reading.food_level = FoodLevel::Low;
    app.tick(at(9, 0, 30), &mut hw, &mut sink);
    app.tick(at(9, 1, 0), &mut hw, &mut sink);
    hw.reading.food_level = FoodLevel::Empty;
    app.tick(at(9, 1, 30), &mut hw, &mut sink);
    assert_eq!(app.unread_count(), 1);

    hw.reading.food_level = FoodLevel::Full;
    app.tick(at(9, 2, 0), &mut hw, &mut sink);
    hw.reading.food_level = FoodLevel::Low;
    app.tick(at(9, 2, 30), &mut hw, &mut sink);
    assert_eq!(app.unread_count(), 2);
}

#[test]
fn connection_lost_is_silent_by_default() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.reading.connected = false;
    app.tick(at(9, 0, 0), &mut hw, &mut sink);

    assert_eq!(app.status().connection_label(), "Offline");
    assert_eq!(app.unread_count(), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::StatusChanged(_))),
        1
    );
}

#[test]
fn connection_lost_notifies_when_enabled() {
    let mut settings = FeederSettings::default();
    settings.notifications.connection_lost = true;
    let mut app = FeederService::new(FeederConfig::default(), settings);
    let mut hw = MockFeeder::new();
    let mut sink = RecordingSink::new();

    hw.reading.connected = false;
    app.tick(at(9, 0, 0), &mut hw, &mut sink);

    let list = app.notifications().newest_first();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].message, "Feeder connection lost.");
}

#[test]
fn dashboard_emitted_on_interval() {
    let (mut app, mut hw, mut sink) = make_app();
    app.tick(at(9, 0, 0), &mut hw, &mut sink);
    app.tick(at(9, 2, 0), &mut hw, &mut sink);
    app.tick(at(9, 5, 0), &mut hw, &mut sink);
    assert_eq!(sink.dashboards(), 2);

    let Some(AppEvent::Dashboard(view)) = sink
        .events
        .iter()
        .find(|e| matches!(e, AppEvent::Dashboard(_)))
    else {
        panic!("no dashboard event");
    };
    assert_eq!(view.feeder_name, "Kitchen Feeder");
    assert_eq!(view.next_meal, "in about 9 hours (60g)");
    assert_eq!(view.last_fed, "Never");
    assert_eq!(view.active_schedules, 2);
}

// ── Notifications ─────────────────────────────────────────────

#[test]
fn notification_commands() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.fail_next(DispenseError::Jammed, 2);
    let _ = app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink);
    let _ = app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 5, 0), &mut hw, &mut sink);
    assert_eq!(app.unread_count(), 2);

    let newest = app.notifications().newest_first()[0].id;
    app.handle_command(AppCommand::MarkNotificationRead(newest), at(9, 6, 0), &mut hw, &mut sink)
        .unwrap();
    assert_eq!(app.unread_count(), 1);

    app.handle_command(AppCommand::DeleteNotification(newest), at(9, 6, 0), &mut hw, &mut sink)
        .unwrap();
    assert_eq!(app.notifications().len(), 1);

    let missing = NotificationId(999);
    assert_eq!(
        app.handle_command(AppCommand::MarkNotificationRead(missing), at(9, 6, 0), &mut hw, &mut sink),
        Err(Error::NotificationNotFound(missing))
    );

    app.handle_command(AppCommand::ClearNotifications, at(9, 7, 0), &mut hw, &mut sink)
        .unwrap();
    assert!(app.notifications().is_empty());
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn invalid_settings_leave_state_unchanged() {
    let (mut app, mut hw, mut sink) = make_app();
    let bad = FeederSettings {
        time_zone: "Mars/Olympus".into(),
        ..Default::default()
    };
    assert!(
        app.handle_command(AppCommand::UpdateSettings(bad), at(9, 0, 0), &mut hw, &mut sink)
            .is_err()
    );
    assert_eq!(app.settings(), &FeederSettings::default());
    assert!(!app.is_settings_dirty());
}

#[test]
fn save_settings_flushes_without_delay() {
    let (mut app, mut hw, mut sink) = make_app();
    let store = MockStore::new();
    let renamed = FeederSettings {
        feeder_name: "Cat Bowl".into(),
        ..Default::default()
    };

    app.handle_command(AppCommand::UpdateSettings(renamed.clone()), at(9, 0, 0), &mut hw, &mut sink)
        .unwrap();
    assert!(!app.auto_save_if_needed(&store, at(9, 0, 1)));

    app.handle_command(AppCommand::SaveSettings, at(9, 0, 2), &mut hw, &mut sink)
        .unwrap();
    assert!(app.auto_save_if_needed(&store, at(9, 0, 2)));
    assert_eq!(store.last_saved(), Some(renamed));
    assert!(!app.is_settings_dirty());
}

#[test]
fn force_save_only_when_dirty() {
    let (mut app, mut hw, mut sink) = make_app();
    let store = MockStore::new();
    app.force_save_if_dirty(&store);
    assert_eq!(store.save_count.get(), 0);

    app.handle_command(
        AppCommand::UpdateSettings(FeederSettings::default()),
        at(9, 0, 0),
        &mut hw,
        &mut sink,
    )
    .unwrap();
    app.force_save_if_dirty(&store);
    assert_eq!(store.save_count.get(), 1);
}

// ── History restore ───────────────────────────────────────────

#[test]
fn restore_history_recovers_last_fed() {
    let mut store = MockStore::new();
    {
        let (mut app, mut hw, mut sink) = make_app();
        app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink)
            .unwrap();
        app.handle_command(AppCommand::ManualFeed { grams: 20 }, at(12, 0, 0), &mut hw, &mut sink)
            .unwrap();
        app.persist_history(&mut store);
    }

    let (mut app, _hw, _sink) = make_app();
    app.restore_history(&store);
    assert_eq!(app.status().last_fed, Some(at(12, 0, 0)));
    assert_eq!(app.feed_history(&store).len(), 2);
}

#[test]
fn failed_index_write_does_not_duplicate_feed() {
    let mut store = MockStore::new();
    store.fail_writes("feed_idx", 1);
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(app.persist_history(&mut store), 0);
    assert_eq!(app.persist_history(&mut store), 1);
    assert_eq!(app.persist_history(&mut store), 0);

    let history = app.feed_history(&store);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].grams, 40);
}

#[test]
fn failed_slot_write_does_not_duplicate_feed() {
    let mut store = MockStore::new();
    store.fail_writes("f0", 1);
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(AppCommand::FeedNow { grams: 40 }, at(9, 0, 0), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(app.persist_history(&mut store), 0);
    assert_eq!(app.persist_history(&mut store), 1);
    assert_eq!(app.feed_history(&store).len(), 1);
}

#[test]
fn unwritten_history_keeps_only_newest_feeds() {
    let mut store = MockStore::new();
    store.fail_writes("feed_idx", u32::MAX);
    let (mut app, mut hw, mut sink) = make_app();
    for i in 0..10u16 {
        app.handle_command(
            AppCommand::FeedNow { grams: 10 + i },
            at(9, i as u32, 0),
            &mut hw,
            &mut sink,
        )
        .unwrap();
    }
    assert_eq!(app.persist_history(&mut store), 0);

    store.fail_writes("feed_idx", 0);
    assert_eq!(app.persist_history(&mut store), 8);
    let history = app.feed_history(&store);
    assert_eq!(history.len(), 8);
    assert_eq!(history[0].at, at(9, 2, 0));
    assert_eq!(history[7].grams, 19);
}

#[test]
fn empty_schedule_book_has_no_next_feed() {
    let (app, _hw, _sink) = make_app();
    let app = app.with_schedules(ScheduleBook::new(FeederConfig::default().schedule_portion));
    assert!(app.schedules().is_empty());
    assert!(app.next_feed(at(9, 0, 0)).is_none());
}
