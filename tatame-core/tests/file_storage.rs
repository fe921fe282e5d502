mod common;

use shared::models::StudentCreate;
use std::sync::Arc;
use tatame_core::{JsonFileStorage, PromotionOutcome};

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config(20);

    let storage = Arc::new(JsonFileStorage::new(dir.path()));
    let state = common::start(storage, config.clone()).await;
    let student = state
        .add_student(StudentCreate {
            name: "Carlos".to_string(),
            age: 28,
            belt_name: Some("Purple".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert!(matches!(state.promote(&student.id), PromotionOutcome::Promoted { .. }));
    state.shutdown().await;

    assert!(dir.path().join("data").join("students.json").exists());
    assert!(dir.path().join("data").join("app_settings.json").exists());

    let storage = Arc::new(JsonFileStorage::new(dir.path()));
    let reloaded = common::start(storage, config).await;
    assert_eq!(reloaded.students(), state.students());
    assert_eq!(reloaded.graduation_settings(), state.graduation_settings());
    reloaded.shutdown().await;
}

#[tokio::test]
async fn test_corrupt_file_is_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("students.json"), "{{{ not json").unwrap();

    let storage = Arc::new(JsonFileStorage::new(dir.path()));
    let state = common::start(storage, common::config(20)).await;
    assert!(state.students().is_empty());
    state.shutdown().await;

    let repaired = std::fs::read_to_string(data_dir.join("students.json")).unwrap();
    assert_eq!(repaired.trim(), "[]");
    let kept = std::fs::read_to_string(data_dir.join("students.json.corrupt")).unwrap();
    assert_eq!(kept, "{{{ not json");
}
