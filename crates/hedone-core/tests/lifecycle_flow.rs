//! End-to-end lifecycle tests against the in-memory storage stub.

use std::sync::Arc;

use hedone_core::error::EngineError;
use hedone_core::lifecycle::SessionLifecycle;
use hedone_core::stubs::InMemorySessionStore;
use hedone_core::traits::SessionStore;
use hedone_core::types::{Dimension, SessionState};

fn lifecycle_with_store() -> (SessionLifecycle, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    (SessionLifecycle::new(store.clone()), store)
}

#[tokio::test]
async fn full_session_produces_expected_vector_and_resets() {
    let (mut lifecycle, store) = lifecycle_with_store();

    lifecycle.start_session("user-1").await.unwrap();
    lifecycle
        .activate_dimension(Dimension::SerendipityFollowing)
        .unwrap();
    lifecycle.activate_dimension(Dimension::Mobility).unwrap();
    lifecycle
        .activate_dimension(Dimension::NatureMirror)
        .unwrap();

    let ended = lifecycle.end_session().await.unwrap().expect("session");
    let vector = ended.vector.as_ref().expect("finalized vector");

    assert_eq!(
        vector.primary_dimensions(),
        vec![
            Dimension::SerendipityFollowing,
            Dimension::Mobility,
            Dimension::NatureMirror
        ]
    );
    assert!(vector.secondary_dimensions().is_empty());
    assert_eq!(vector.activation(Dimension::SerendipityFollowing), Some(1.0));
    assert_eq!(vector.activation(Dimension::Mobility), Some(0.9));
    assert_eq!(vector.activation(Dimension::NatureMirror), Some(0.8));

    // Machine is reset for the next session.
    assert_eq!(lifecycle.state(), SessionState::Idle);
    assert!(lifecycle.history().is_empty());
    assert!(lifecycle.active_session().is_none());

    // The finalized record reached storage.
    let stored = store
        .get_session(ended.id)
        .await
        .unwrap()
        .expect("persisted session");
    assert!(stored.is_ended());
    assert!(stored.has_valid_embedding());
    assert_eq!(
        stored.state_history.first().copied(),
        Some(SessionState::Idle)
    );
}

#[tokio::test]
async fn second_start_without_end_is_rejected() {
    let (mut lifecycle, _store) = lifecycle_with_store();

    lifecycle.start_session("user-1").await.unwrap();
    let err = lifecycle.start_session("user-1").await.unwrap_err();
    assert!(matches!(err, EngineError::SessionAlreadyActive { .. }));

    // Ending clears the way for a fresh start.
    lifecycle.end_session().await.unwrap();
    lifecycle.start_session("user-1").await.unwrap();
    assert_eq!(lifecycle.state(), SessionState::Drift);
}

#[tokio::test]
async fn idle_to_mastery_is_an_invalid_transition() {
    let (mut lifecycle, _store) = lifecycle_with_store();

    let err = lifecycle.transition(SessionState::Mastery).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            from: SessionState::Idle,
            to: SessionState::Mastery,
        }
    ));
}

#[tokio::test]
async fn state_tour_records_ordered_history() {
    let (mut lifecycle, _store) = lifecycle_with_store();

    lifecycle.start_session("user-1").await.unwrap();
    lifecycle.transition(SessionState::Mastery).unwrap();
    lifecycle.transition(SessionState::SocialSync).unwrap();
    lifecycle.transition(SessionState::Drift).unwrap();

    assert_eq!(
        lifecycle.history(),
        &[
            SessionState::Idle,
            SessionState::Drift,
            SessionState::Mastery,
            SessionState::SocialSync,
        ]
    );

    let ended = lifecycle.end_session().await.unwrap().expect("session");
    // Persisted history additionally records the drift state we left when
    // entering reflection.
    assert_eq!(
        ended.state_history,
        vec![
            SessionState::Idle,
            SessionState::Drift,
            SessionState::Mastery,
            SessionState::SocialSync,
            SessionState::Drift,
        ]
    );
    assert_eq!(ended.state, SessionState::Reflection);
}

#[tokio::test]
async fn end_session_twice_second_is_noop() {
    let (mut lifecycle, _store) = lifecycle_with_store();

    lifecycle.start_session("user-1").await.unwrap();
    assert!(lifecycle.end_session().await.unwrap().is_some());
    assert!(lifecycle.end_session().await.unwrap().is_none());
}

#[tokio::test]
async fn deactivated_dimension_is_absent_from_final_vector() {
    let (mut lifecycle, _store) = lifecycle_with_store();

    lifecycle.start_session("user-1").await.unwrap();
    lifecycle.activate_dimension(Dimension::Anxiety).unwrap();
    lifecycle.activate_dimension(Dimension::Food).unwrap();
    lifecycle.deactivate_dimension(Dimension::Anxiety).unwrap();

    let ended = lifecycle.end_session().await.unwrap().expect("session");
    let vector = ended.vector.as_ref().expect("vector");
    assert_eq!(vector.activation(Dimension::Anxiety), None);
    // Food moved up to position 0 after the removal.
    assert_eq!(vector.activation(Dimension::Food), Some(1.0));
}

#[tokio::test]
async fn empty_session_finalizes_to_zero_vector() {
    let (mut lifecycle, _store) = lifecycle_with_store();

    lifecycle.start_session("user-1").await.unwrap();
    let ended = lifecycle.end_session().await.unwrap().expect("session");
    let vector = ended.vector.as_ref().expect("vector");

    assert!(vector.is_empty());
    assert!(vector.embedding().iter().all(|&x| x == 0.0));
}

#[tokio::test]
async fn serialized_calls_through_shared_mutex_apply_in_order() {
    // Multiple triggers (voice, vision, UI) funnel through one mutex; the
    // accumulator must reflect the lock acquisition order.
    let store = Arc::new(InMemorySessionStore::new());
    let lifecycle = Arc::new(tokio::sync::Mutex::new(SessionLifecycle::new(store)));

    lifecycle.lock().await.start_session("user-1").await.unwrap();

    let mut handles = Vec::new();
    for dim in [Dimension::Order, Dimension::Path, Dimension::Power] {
        let lifecycle = lifecycle.clone();
        handles.push(tokio::spawn(async move {
            lifecycle.lock().await.activate_dimension(dim).unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let guard = lifecycle.lock().await;
    let mut activated: Vec<Dimension> = guard.activated_dimensions().to_vec();
    activated.sort_by_key(|d| d.index());
    assert_eq!(
        activated,
        vec![Dimension::Order, Dimension::Path, Dimension::Power]
    );
}
