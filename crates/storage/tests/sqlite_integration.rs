use std::sync::Arc;

use quiz_core::model::{PlayerName, Question, QuizAttempt, QuizSnapshot, SessionPhase};
use quiz_core::time::fixed_now;
use storage::repository::SlotStore;
use storage::sqlite::SqliteRepository;
use storage::{SnapshotGateway, Storage};

fn snapshot(answered: usize, time_left: u32) -> QuizSnapshot {
    let questions = (0..10)
        .map(|n| {
            Question::new(
                format!("Question {n} &amp; more?"),
                "Right",
                vec![
                    "Wrong 1".into(),
                    "Right".into(),
                    "Wrong 2".into(),
                    "Wrong 3".into(),
                ],
                "History",
                "medium",
            )
            .unwrap()
        })
        .collect();
    let mut attempt = QuizAttempt::new(questions, time_left).unwrap();
    for n in 0..answered {
        let pick = if n % 2 == 0 { "Right" } else { "Wrong 2" };
        attempt.record_answer(pick).unwrap();
    }
    QuizSnapshot::capture(
        &PlayerName::new("Margaret").unwrap(),
        &attempt,
        SessionPhase::InProgress,
        fixed_now(),
    )
}

#[tokio::test]
async fn sqlite_slots_overwrite_and_remove() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_slots?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.read_slot("quizAppData").await.unwrap(), None);

    repo.write_slot("quizAppData", "one").await.unwrap();
    repo.write_slot("quizAppData", "two").await.unwrap();
    assert_eq!(
        repo.read_slot("quizAppData").await.unwrap().as_deref(),
        Some("two")
    );

    repo.remove_slot("quizAppData").await.unwrap();
    repo.remove_slot("quizAppData").await.unwrap();
    assert_eq!(repo.read_slot("quizAppData").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.write_slot("k", "v").await.unwrap();
    assert_eq!(repo.read_slot("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn snapshot_round_trips_through_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_snapshot?mode=memory&cache=shared")
        .await
        .expect("storage");
    let gateway = SnapshotGateway::new(Arc::clone(&storage.slots), "quizAppData");

    let original = snapshot(3, 120);
    gateway.save(&original).await.unwrap();
    let loaded = gateway.load().await.expect("snapshot present");
    assert_eq!(loaded, original);
    assert!(loaded.is_resumable());
    assert_eq!(loaded.current_question_index, 3);
    assert_eq!(loaded.time_remaining_secs, 120);

    gateway.clear().await.unwrap();
    assert_eq!(gateway.load().await, None);
}
