//! PlayerFacade end-to-end tests
//!
//! Drives the facade the way a UI would, with fake transport, output and
//! report sink recording into a shared journal.

mod common;

use common::{harness, harness_with, track, tracks};
use std::sync::Arc;
use std::time::Duration;
use streamflow_core::{AudioPayload, PlaylistId, StaticCredentials, Track};
use streamflow_playback::{PlaybackError, PlaybackState, PlayerConfig, PlayerEvent, RepeatMode};

fn current_id(snapshot: &streamflow_playback::PlayerSnapshot) -> Option<String> {
    snapshot
        .current_track
        .as_ref()
        .map(|t| t.id.as_str().to_string())
}

// ===== Queue navigation =====

#[tokio::test]
async fn repeat_off_runs_to_terminal_and_keeps_queue() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B", "C"]), 0, None).await.unwrap();

    h.player.skip_next().await.unwrap();
    assert_eq!(current_id(&h.player.snapshot().await).as_deref(), Some("B"));

    h.player.skip_next().await.unwrap();
    assert_eq!(current_id(&h.player.snapshot().await).as_deref(), Some("C"));

    h.player.skip_next().await.unwrap();
    let snapshot = h.player.snapshot().await;
    assert!(snapshot.current_track.is_none());
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert_eq!(snapshot.queue.map(|q| q.len()), Some(3));
    assert_eq!(snapshot.cursor, Some(2));
    assert_eq!(h.player.live_handles(), 0);
}

#[tokio::test]
async fn repeat_all_wraps_around() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B", "C"]), 0, None).await.unwrap();
    assert_eq!(h.player.toggle_repeat().await, RepeatMode::All);

    let mut seen = Vec::new();
    for _ in 0..3 {
        h.player.skip_next().await.unwrap();
        let snapshot = h.player.snapshot().await;
        seen.push((current_id(&snapshot).unwrap(), snapshot.cursor.unwrap()));
    }

    assert_eq!(
        seen,
        vec![("B".into(), 1), ("C".into(), 2), ("A".into(), 0)]
    );
    assert!(h.player.snapshot().await.is_playing);
}

#[tokio::test]
async fn standalone_track_skip_is_terminal() {
    let h = harness();
    h.player.play_track(track("X")).await.unwrap();
    assert!(h.player.snapshot().await.queue.is_none());

    h.player.skip_next().await.unwrap();
    let snapshot = h.player.snapshot().await;
    assert!(snapshot.current_track.is_none());
    assert!(!snapshot.is_playing);

    h.player.play_track(track("Y")).await.unwrap();
    h.player.skip_previous().await.unwrap();
    assert!(h.player.snapshot().await.current_track.is_none());
}

#[tokio::test]
async fn previous_at_start_with_repeat_off_stops() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 1, None).await.unwrap();

    h.player.skip_previous().await.unwrap();
    assert_eq!(current_id(&h.player.snapshot().await).as_deref(), Some("A"));

    h.player.skip_previous().await.unwrap();
    assert!(h.player.snapshot().await.current_track.is_none());
}

#[tokio::test]
async fn play_after_terminal_restarts_queue_position() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 1, None).await.unwrap();
    h.player.skip_next().await.unwrap();
    assert!(h.player.snapshot().await.current_track.is_none());

    let state = h.player.toggle_play_pause().await.unwrap();
    assert_eq!(state, PlaybackState::Playing);
    assert_eq!(current_id(&h.player.snapshot().await).as_deref(), Some("B"));
}

#[tokio::test]
async fn invalid_start_index_changes_nothing() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();
    h.journal.clear();

    let err = h
        .player
        .play_queue(tracks(&["X", "Y"]), 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidIndex { index: 5, len: 2 }));

    let snapshot = h.player.snapshot().await;
    assert_eq!(current_id(&snapshot).as_deref(), Some("A"));
    assert!(snapshot.is_playing);
    assert!(h.journal.entries().is_empty());
}

// ===== Sessions =====

#[tokio::test]
async fn pausing_completes_session_exactly_once() {
    let h = harness();
    h.player.play_track(track("t1")).await.unwrap();
    assert_eq!(h.journal.count("start:t1"), 1);

    h.clock.advance(Duration::from_secs(3));
    let state = h.player.toggle_play_pause().await.unwrap();
    assert_eq!(state, PlaybackState::Paused);

    let completions = h.journal.completions();
    assert_eq!(completions, vec![3.0]);
    assert!(completions[0] >= 0.0);

    h.player.stop().await;
    assert_eq!(h.journal.completions().len(), 1);
}

#[tokio::test]
async fn resume_opens_new_session_but_counts_one_play() {
    let h = harness();
    h.player.play_track(track("t1")).await.unwrap();
    h.player.toggle_play_pause().await.unwrap();
    h.player.toggle_play_pause().await.unwrap();

    assert_eq!(h.journal.count("start:t1"), 2);
    assert_eq!(h.journal.count("played:t1"), 1);
}

#[tokio::test]
async fn skip_completes_session_before_teardown_before_load() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();
    h.clock.advance(Duration::from_secs(5));
    h.journal.clear();

    h.player.skip_next().await.unwrap();

    let complete = h.journal.position("complete:A:5").unwrap();
    let detach = h.journal.position("detach").unwrap();
    let fetch = h.journal.position("fetch:B").unwrap();
    assert!(complete < detach);
    assert!(detach < fetch);
    assert_eq!(h.journal.count("start:B"), 1);
    assert_eq!(h.journal.count("played:B"), 1);
}

#[tokio::test]
async fn sessions_carry_playlist_context() {
    let h = harness();
    h.player
        .play_queue(tracks(&["A"]), 0, Some(PlaylistId::from("p7")))
        .await
        .unwrap();

    assert_eq!(h.journal.count("start:A:p7"), 1);
    assert_eq!(h.player.snapshot().await.context, Some(PlaylistId::from("p7")));
}

#[tokio::test]
async fn toggles_have_no_session_side_effects() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B", "C", "D"]), 2, None).await.unwrap();
    let before = h.journal.entries();

    assert!(h.player.toggle_shuffle().await);
    h.player.toggle_repeat().await;
    assert!(!h.player.toggle_shuffle().await);

    assert_eq!(h.journal.entries(), before);
    let snapshot = h.player.snapshot().await;
    assert_eq!(current_id(&snapshot).as_deref(), Some("C"));
    assert_eq!(snapshot.cursor, Some(2));
}

// ===== Natural end =====

#[tokio::test]
async fn natural_end_advances_queue() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();
    h.clock.advance(Duration::from_secs(200));

    h.player.on_media_ended().await.unwrap();

    assert_eq!(h.journal.completions(), vec![200.0]);
    let snapshot = h.player.snapshot().await;
    assert_eq!(current_id(&snapshot).as_deref(), Some("B"));
    assert!(snapshot.is_playing);

    h.player.on_media_ended().await.unwrap();
    assert_eq!(h.player.snapshot().await.state, PlaybackState::Idle);
}

#[tokio::test]
async fn natural_end_with_repeat_one_replays() {
    let config = PlayerConfig {
        repeat: RepeatMode::One,
        ..Default::default()
    };
    let h = harness_with(config, StaticCredentials::new("token"));
    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();

    h.player.on_media_ended().await.unwrap();

    assert_eq!(current_id(&h.player.snapshot().await).as_deref(), Some("A"));
    assert_eq!(h.journal.count("fetch:A"), 2);
    assert_eq!(h.journal.count("played:A"), 2);
}

#[tokio::test]
async fn media_end_while_paused_is_ignored() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();
    h.player.toggle_play_pause().await.unwrap();

    h.player.on_media_ended().await.unwrap();
    assert_eq!(current_id(&h.player.snapshot().await).as_deref(), Some("A"));
}

// ===== Load failures =====

#[tokio::test]
async fn failed_load_is_surfaced_and_not_playing() {
    let h = harness();
    let mut gone = AudioPayload::ok("application/json", b"{\"detail\":\"missing\"}".to_vec());
    gone.status = 404;
    h.transport.respond("bad", gone);

    let err = h.player.play_track(track("bad")).await.unwrap_err();
    assert!(matches!(err, PlaybackError::Load { status: 404 }));

    let snapshot = h.player.snapshot().await;
    assert_eq!(snapshot.state, PlaybackState::Errored);
    assert!(!snapshot.is_playing);
    assert_eq!(h.journal.count("start:"), 0);
    assert!(h
        .player
        .drain_events()
        .await
        .iter()
        .any(|e| matches!(e, PlayerEvent::Error { .. })));
}

#[tokio::test]
async fn html_error_page_is_rejected() {
    let h = harness();
    h.transport
        .respond("html", AudioPayload::ok("text/html; charset=utf-8", b"<html/>".to_vec()));

    let err = h.player.play_track(track("html")).await.unwrap_err();
    assert!(matches!(err, PlaybackError::UnsupportedContent(_)));
    assert_eq!(h.player.live_handles(), 0);
}

#[tokio::test]
async fn missing_credentials_fail_before_fetch() {
    let h = harness_with(PlayerConfig::default(), StaticCredentials::anonymous());

    let err = h.player.play_track(track("A")).await.unwrap_err();
    assert!(matches!(err, PlaybackError::Unauthenticated));
    assert_eq!(h.journal.count("fetch:"), 0);
}

// ===== Cancellation =====

#[tokio::test]
async fn superseded_load_is_discarded() {
    let h = harness();
    let gate = h.transport.gate("slow");

    let player = h.player.clone();
    let slow = tokio::spawn(async move { player.play_track(track("slow")).await });

    while h.journal.count("fetch:slow") == 0 {
        tokio::task::yield_now().await;
    }

    h.player.play_track(track("fast")).await.unwrap();
    gate.notify_one();
    slow.await.unwrap().unwrap();

    let snapshot = h.player.snapshot().await;
    assert_eq!(current_id(&snapshot).as_deref(), Some("fast"));
    assert!(snapshot.is_playing);
    assert_eq!(h.player.live_handles(), 1);
    assert_eq!(h.journal.count("attach:slow"), 0);
    assert_eq!(h.journal.count("start:slow"), 0);
}

// ===== Stop, seek, volume =====

#[tokio::test]
async fn stop_returns_to_idle() {
    let h = harness();
    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();
    h.player.set_progress(0.5).await.unwrap();
    h.player.stop().await;

    let snapshot = h.player.snapshot().await;
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert!(snapshot.current_track.is_none());
    assert!(snapshot.queue.is_none());
    assert_eq!(snapshot.cursor, None);
    assert_eq!(snapshot.progress, 0.0);
    assert_eq!(h.journal.completions().len(), 1);
    assert_eq!(h.player.live_handles(), 0);

    assert!(matches!(
        h.player.toggle_play_pause().await,
        Err(PlaybackError::NoTrackLoaded)
    ));
}

#[tokio::test]
async fn seek_clamps_without_changing_play_state() {
    let h = harness();
    h.player.play_track(track("A")).await.unwrap();

    assert_eq!(h.player.set_progress(1.5).await.unwrap(), 1.0);
    assert_eq!(h.player.set_progress(-0.2).await.unwrap(), 0.0);
    assert_eq!(h.player.set_progress(0.25).await.unwrap(), 0.25);

    let snapshot = h.player.snapshot().await;
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.progress, 0.25);
    assert_eq!(h.journal.count("seek:50"), 1);
    assert_eq!(h.journal.count("complete:"), 0);
}

#[tokio::test]
async fn seek_on_very_long_track_saturates() {
    let h = harness();
    let big = Arc::new(Track::new("big", "Big", "Test Artist", 1e30));
    h.player.play_track(big).await.unwrap();

    assert_eq!(h.player.set_progress(0.5).await.unwrap(), 0.5);
    assert_eq!(h.player.set_progress(1.0).await.unwrap(), 1.0);

    let snapshot = h.player.snapshot().await;
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.progress, 1.0);
}

#[tokio::test]
async fn seek_without_track_is_rejected() {
    let h = harness();
    assert!(matches!(
        h.player.set_progress(0.5).await,
        Err(PlaybackError::InvalidOperation(_))
    ));
}

#[tokio::test]
async fn volume_clamps_and_persists_across_tracks() {
    let h = harness();
    assert_eq!(h.player.snapshot().await.volume, 75);

    assert_eq!(h.player.set_volume(250).await, 100);
    assert_eq!(h.player.set_volume(-10).await, 0);
    h.player.set_volume(30).await;

    h.player.play_queue(tracks(&["A", "B"]), 0, None).await.unwrap();
    h.player.skip_next().await.unwrap();
    h.player.stop().await;
    assert_eq!(h.player.snapshot().await.volume, 30);

    assert!(h.player.toggle_mute().await);
    let snapshot = h.player.snapshot().await;
    assert!(snapshot.muted);
    assert_eq!(snapshot.volume, 30);
}

#[tokio::test]
async fn media_progress_is_reflected_in_snapshot() {
    let h = harness();
    h.player.play_track(track("A")).await.unwrap();

    h.player.on_media_progress(Duration::from_secs(50)).await;
    assert_eq!(h.player.snapshot().await.progress, 0.25);
}

// ===== Events =====

#[tokio::test]
async fn events_describe_the_transition() {
    let h = harness();
    h.player.play_track(track("A")).await.unwrap();

    let events = h.player.drain_events().await;
    let states: Vec<PlaybackState> = events
        .iter()
        .filter_map(|e| match e {
            PlayerEvent::StateChanged { state } => Some(*state),
            _ => None,
        })
        .collect();

    assert_eq!(
        states,
        vec![
            PlaybackState::Loading,
            PlaybackState::Ready,
            PlaybackState::Playing
        ]
    );
    assert!(h.player.drain_events().await.is_empty());
}
