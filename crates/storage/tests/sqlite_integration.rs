use quiz_core::model::{Difficulty, Question, Section, UserId};
use storage::repository::{QuestionBank, QuestionSource, ScoreStore, Storage, StorageError};
use storage::seed::{seed_starter_bank, starter_questions};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_serves_questions_for_the_requested_topic() {
    let repo = connect("memdb_questions").await;

    repo.add_question(Section::Dynamics, Difficulty::Beginner, &Question::new("2+2", 4))
        .await
        .unwrap();
    repo.add_question(Section::Mechanics, Difficulty::Beginner, &Question::new("3+3", 6))
        .await
        .unwrap();

    let q = repo
        .random_question(Section::Dynamics, Difficulty::Beginner)
        .await
        .expect("question");
    assert_eq!(q, Question::new("2+2", 4));

    let missing = repo
        .random_question(Section::Electrostatics, Difficulty::Expert)
        .await
        .unwrap_err();
    assert!(matches!(missing, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_scores_upsert_and_rank() {
    let repo = connect("memdb_scores").await;
    let alice = UserId::new(1);
    let bob = UserId::new(2);
    let carol = UserId::new(3);

    assert_eq!(repo.score_of(alice).await.unwrap(), None);

    repo.increment(alice, 3).await.unwrap();
    let record = repo.increment(alice, 2).await.unwrap();
    assert_eq!(record.user, alice);
    assert_eq!(record.total_score, 5);
    repo.increment(bob, 5).await.unwrap();
    repo.increment(carol, 1).await.unwrap();

    assert_eq!(repo.score_of(alice).await.unwrap(), Some(5));
    assert_eq!(repo.count_strictly_greater(5).await.unwrap(), 0);
    assert_eq!(repo.count_strictly_greater(1).await.unwrap(), 2);
}

#[tokio::test]
async fn migrations_can_run_twice() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_seeds_every_bucket() {
    let storage = Storage::sqlite("sqlite:file:memdb_seeded?mode=memory&cache=shared")
        .await
        .expect("storage");

    let inserted = seed_starter_bank(storage.question_bank.as_ref())
        .await
        .unwrap();
    assert_eq!(inserted, starter_questions().len());

    for section in Section::ALL {
        for difficulty in Difficulty::ALL {
            storage
                .questions
                .random_question(section, difficulty)
                .await
                .expect("seeded question");
        }
    }
}
