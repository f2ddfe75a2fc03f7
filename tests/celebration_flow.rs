use std::{sync::Arc, time::Duration};

use birthday_lib::{
    audio::SilentPlayer,
    celebration::{controller::FINALE_SETTLE, ButtonKey, Phase},
    clock::TokioClock,
    countdown::CountdownState,
    events::{Events, MemorySink, BIRTHDAY_REACHED, EFFECT, PAGE_CHANGED},
    navigation::{controller::settle_delay, GoTo, PageId},
    session::FlagStore,
    AppConfig, BirthdayApp,
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use tokio::time;

fn config_with_target_in(secs: i64) -> AppConfig {
    let now = Utc.with_ymd_and_hms(2026, 1, 30, 16, 0, 0).unwrap();
    AppConfig {
        target: Some((now + ChronoDuration::seconds(secs)).to_rfc3339()),
        recipient_name: "Sam".into(),
        decor_seed: Some(3),
        ..AppConfig::default()
    }
}

fn build(config: AppConfig, store: Arc<FlagStore>) -> (Arc<MemorySink>, BirthdayApp) {
    let now = Utc.with_ymd_and_hms(2026, 1, 30, 16, 0, 0).unwrap();
    let sink = MemorySink::new();
    let app = BirthdayApp::new(
        config,
        store,
        Events::new(sink.clone()),
        Arc::new(SilentPlayer::new()),
        Arc::new(TokioClock::starting_at(now)),
    )
    .unwrap();
    (sink, app)
}

async fn settle() {
    time::sleep(settle_delay() + Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn countdown_to_gallery_and_back() {
    let (sink, app) = build(config_with_target_in(2), Arc::new(FlagStore::in_memory()));
    app.start().await;

    time::sleep(Duration::from_secs(3)).await;
    assert_eq!(sink.count(BIRTHDAY_REACHED), 1);
    assert!(!app.countdown().is_running().await);

    assert!(matches!(
        app.begin_celebration().await,
        GoTo::Started { .. }
    ));
    settle().await;
    assert_eq!(app.navigation().current().await, PageId::Celebration);

    let celebration = app.celebration();
    celebration.handle_key("Enter").await;
    celebration.handle_key("n").await;
    let view = celebration.handle_key("y").await;
    assert_eq!(view.phase, Phase::Slideshow { index: 2 });
    assert!(view.slide.unwrap().text.contains("go"));

    let view = celebration.advance().await;
    assert_eq!(view.phase, Phase::ButtonChain);
    assert_eq!(view.visible_buttons, vec![ButtonKey::Lights]);

    // Out of order first: nothing happens.
    celebration.activate(ButtonKey::Balloons).await;
    for key in ButtonKey::CHAIN {
        celebration.activate(key).await;
    }

    time::sleep(FINALE_SETTLE).await;
    settle().await;
    assert_eq!(app.navigation().current().await, PageId::Message);

    let message = app.message().open_curtains().await;
    assert!(message.reveal.opened);

    app.go_to_number(4).await.unwrap();
    settle().await;
    let gallery = app.gallery();
    gallery.open(11).await;
    let view = gallery.next().await;
    assert_eq!(view.open, Some(0));
    assert_eq!(gallery.handle_key("Escape").await.open, None);

    // Back buttons: gallery to message, message to celebration.
    app.go_to_number(3).await.unwrap();
    settle().await;
    assert!(!app.message().view().await.reveal.opened);
    app.go_to_number(2).await.unwrap();
    settle().await;

    let view = app.celebration().view().await;
    assert_eq!(view.phase, Phase::Slideshow { index: 0 });
    assert!(!view.buttons.lights);

    let kinds: Vec<String> = sink
        .named(EFFECT)
        .iter()
        .filter_map(|effect| effect["kind"].as_str().map(str::to_string))
        .collect();
    for expected in [
        "birthdayCelebration",
        "questionRejected",
        "buttonsRevealed",
        "lightsOn",
        "musicNotes",
        "confetti",
        "finale",
        "curtainsOpened",
        "revealPhotos",
    ] {
        assert!(kinds.iter().any(|kind| kind == expected), "missing {expected}");
    }
    assert_eq!(
        kinds.iter().filter(|kind| *kind == "buttonBurst").count(),
        ButtonKey::CHAIN.len()
    );
    assert_eq!(sink.count(PAGE_CHANGED), 5);

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn overlapping_navigation_keeps_the_first_request() {
    let (_, app) = build(config_with_target_in(-1), Arc::new(FlagStore::in_memory()));
    app.start().await;

    app.begin_celebration().await;
    let second = app.go_to_number(4).await.unwrap();
    assert!(matches!(second, GoTo::Busy { .. }));

    settle().await;
    assert_eq!(app.navigation().current().await, PageId::Celebration);
    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn remembered_flag_skips_the_countdown_on_the_next_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    let config = AppConfig {
        remember_reached: true,
        ..config_with_target_in(1)
    };

    let (_, first) = build(config.clone(), Arc::new(FlagStore::new(path.clone()).unwrap()));
    first.start().await;
    time::sleep(Duration::from_secs(2)).await;
    assert!(first.session().is_reached());
    first.shutdown().await;

    let (sink, second) = build(config, Arc::new(FlagStore::new(path).unwrap()));
    let snapshot = second.start().await;
    assert!(!snapshot.running);
    assert_eq!(snapshot.state, CountdownState::terminal());
    assert_eq!(sink.count(BIRTHDAY_REACHED), 0);
    second.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn fresh_load_forgets_a_previous_birthday() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    let store = FlagStore::new(path.clone()).unwrap();
    store.set_birthday_reached(true).unwrap();

    let (_, app) = build(
        config_with_target_in(60),
        Arc::new(FlagStore::new(path).unwrap()),
    );
    let snapshot = app.start().await;
    assert!(snapshot.running);
    assert!(!snapshot.state.reached);
    assert_eq!(snapshot.state.minutes, 1);
    app.shutdown().await;
}
