use futures::future::join_all;
use handle_errors::Error;
use notes_api::store::Store;
use notes_api::types::note::{NewNote, NoteUpdate};
use std::collections::HashSet;

const SEED_COUNT: i64 = 2;

fn new_note(title: &str, content: &str) -> NewNote {
    NewNote {
        title: title.to_string(),
        content: content.to_string(),
    }
}

#[tokio::test]
async fn first_open_seeds_welcome_and_tips() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("notes.db")).await.unwrap();

    let notes = store.get_every_note().await.unwrap();
    let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Welcome", "Tips"]);
    assert!(notes[0].id < notes[1].id);
}

#[tokio::test]
async fn notes_survive_reopen_without_reseeding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let store = Store::new(&path).await.unwrap();
    let created = store.add_note(new_note("Persisted", "still here")).await.unwrap();
    store.delete_note(1).await.unwrap();
    store.connection.close().await;

    let reopened = Store::new(&path).await.unwrap();
    assert_eq!(reopened.get_note(created.id).await.unwrap(), created);
    assert_eq!(reopened.count_notes().await.unwrap(), SEED_COUNT);
    assert!(matches!(
        reopened.get_note(1).await,
        Err(Error::NoteNotFound(1))
    ));
}

#[tokio::test]
async fn created_ids_are_unique_and_listed_once() {
    let store = Store::in_memory().await.unwrap();

    let mut seen = HashSet::new();
    for i in 0..10 {
        let note = store
            .add_note(new_note(&format!("Note {}", i), "body"))
            .await
            .unwrap();
        assert!(seen.insert(note.id), "id {} handed out twice", note.id);

        let listed = store.get_every_note().await.unwrap();
        let matching: Vec<_> = listed.iter().filter(|n| n.id == note.id).collect();
        assert_eq!(matching, vec![&note]);
    }

    let ids: Vec<i64> = store
        .get_every_note()
        .await
        .unwrap()
        .iter()
        .map(|n| n.id)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn partial_updates_keep_untouched_fields() {
    let store = Store::in_memory().await.unwrap();
    let note = store.add_note(new_note("Groceries", "milk")).await.unwrap();

    let updated = store
        .update_note(
            note.id,
            NoteUpdate {
                title: None,
                content: Some("milk, eggs".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Groceries");
    assert_eq!(updated.content, "milk, eggs");
    assert_eq!(updated.created_at, note.created_at);

    let renamed = store
        .update_note(
            note.id,
            NoteUpdate {
                title: Some("Shopping".to_string()),
                content: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.title, "Shopping");
    assert_eq!(renamed.content, "milk, eggs");
}

#[tokio::test]
async fn empty_update_returns_note_unchanged() {
    let store = Store::in_memory().await.unwrap();
    let note = store.add_note(new_note("Same", "as before")).await.unwrap();

    let unchanged = store
        .update_note(note.id, NoteUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged, note);

    assert!(matches!(
        store.update_note(9999, NoteUpdate::default()).await,
        Err(Error::NoteNotFound(9999))
    ));
}

#[tokio::test]
async fn deleted_note_is_gone_for_every_operation() {
    let store = Store::in_memory().await.unwrap();
    let note = store.add_note(new_note("Temporary", "bye")).await.unwrap();

    store.delete_note(note.id).await.unwrap();

    assert!(matches!(
        store.get_note(note.id).await,
        Err(Error::NoteNotFound(id)) if id == note.id
    ));
    assert!(matches!(
        store
            .update_note(
                note.id,
                NoteUpdate {
                    title: Some("Back".to_string()),
                    content: None,
                }
            )
            .await,
        Err(Error::NoteNotFound(_))
    ));
    assert!(matches!(
        store.delete_note(note.id).await,
        Err(Error::NoteNotFound(_))
    ));
}

#[tokio::test]
async fn count_tracks_creates_and_deletes() {
    let store = Store::in_memory().await.unwrap();

    let mut ids = Vec::new();
    for i in 0..7 {
        let note = store
            .add_note(new_note(&format!("n{}", i), "x"))
            .await
            .unwrap();
        ids.push(note.id);
    }
    for id in ids.iter().take(3) {
        store.delete_note(*id).await.unwrap();
    }

    assert_eq!(store.count_notes().await.unwrap(), SEED_COUNT + 7 - 3);
    assert_eq!(
        store.get_every_note().await.unwrap().len() as i64,
        SEED_COUNT + 7 - 3
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_different_notes_do_not_lose_updates() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("notes.db")).await.unwrap();

    let tasks = (0..20).map(|i| {
        let store = store.clone();
        tokio::spawn(async move {
            let note = store
                .add_note(new_note(&format!("Writer {}", i), "draft"))
                .await?;
            store
                .update_note(
                    note.id,
                    NoteUpdate {
                        title: None,
                        content: Some(format!("final {}", i)),
                    },
                )
                .await
        })
    });

    let results = join_all(tasks).await;
    let mut ids = HashSet::new();
    for result in results {
        let note = result.unwrap().unwrap();
        assert!(ids.insert(note.id));
    }

    let notes = store.get_every_note().await.unwrap();
    assert_eq!(notes.len() as i64, SEED_COUNT + 20);
    for note in notes.iter().filter(|n| n.title.starts_with("Writer ")) {
        let i = note.title.trim_start_matches("Writer ");
        assert_eq!(note.content, format!("final {}", i));
    }
}

#[tokio::test]
async fn deleted_newest_id_is_never_handed_out_again() {
    let store = Store::in_memory().await.unwrap();

    let first = store.add_note(new_note("First", "a")).await.unwrap();
    store.delete_note(first.id).await.unwrap();
    let second = store.add_note(new_note("Second", "b")).await.unwrap();

    assert_ne!(second.id, first.id);
    assert!(second.id > first.id);
    assert!(matches!(
        store.get_note(first.id).await,
        Err(Error::NoteNotFound(id)) if id == first.id
    ));
}

#[tokio::test]
async fn deleted_ids_stay_retired_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let store = Store::new(&path).await.unwrap();
    let retired = store.add_note(new_note("Gone", "soon")).await.unwrap();
    store.delete_note(retired.id).await.unwrap();
    store.connection.close().await;

    let reopened = Store::new(&path).await.unwrap();
    let fresh = reopened.add_note(new_note("Fresh", "new")).await.unwrap();
    assert!(fresh.id > retired.id);
    assert!(matches!(
        reopened.get_note(retired.id).await,
        Err(Error::NoteNotFound(_))
    ));
}
