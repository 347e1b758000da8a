use chrono::Utc;
use notes::db::Database;
use notes::models::*;
use speculate2::speculate;

fn create_test_note(db: &Database, title: &str) -> Note {
    db.create_note(NoteInput::new(title, "Some content"))
        .expect("Failed to create note")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "notes" {
        describe "create_note" {
            it "assigns an id and keeps title and content exactly" {
                let started = Utc::now();
                let note = db.create_note(NoteInput::new("Groceries", "Milk, eggs"))
                    .expect("Failed to create note");

                assert_eq!(note.id, 1);
                assert_eq!(note.title, "Groceries");
                assert_eq!(note.content, "Milk, eggs");
                assert!(note.last_modified >= started);
            }

            it "assigns increasing ids" {
                let first = create_test_note(&db, "First");
                let second = create_test_note(&db, "Second");
                assert!(second.id > first.id);
            }

            it "never reuses the id of a deleted note" {
                let first = create_test_note(&db, "First");
                let second = create_test_note(&db, "Second");
                assert!(db.delete_note(second.id).expect("Delete failed"));

                let third = create_test_note(&db, "Third");
                assert!(third.id > second.id);
                assert_ne!(third.id, first.id);
            }
        }

        describe "get_note" {
            it "returns None for a missing id" {
                let result = db.get_note(999).expect("Query failed");
                assert!(result.is_none());
            }

            it "returns the stored record unchanged" {
                let created = create_test_note(&db, "A");
                let found = db.get_note(created.id).expect("Query failed");
                assert_eq!(found, Some(created));
            }
        }

        describe "get_all_notes" {
            it "returns empty list when no notes exist" {
                let notes = db.get_all_notes().expect("Query failed");
                assert!(notes.is_empty());
            }

            it "returns notes in insertion order" {
                create_test_note(&db, "Zebra");
                create_test_note(&db, "Alpha");
                create_test_note(&db, "Middle");

                let titles: Vec<String> = db.get_all_notes()
                    .expect("Query failed")
                    .into_iter()
                    .map(|n| n.title)
                    .collect();
                assert_eq!(titles, vec!["Zebra", "Alpha", "Middle"]);
            }

            it "keeps insertion order after an update" {
                let first = create_test_note(&db, "First");
                create_test_note(&db, "Second");
                db.update_note(first.id, NoteInput::new("First, edited", "x"))
                    .expect("Update failed");

                let notes = db.get_all_notes().expect("Query failed");
                assert_eq!(notes[0].id, first.id);
                assert_eq!(notes[0].title, "First, edited");
            }
        }

        describe "update_note" {
            it "returns None for a missing id" {
                let result = db.update_note(42, NoteInput::new("T", "C")).expect("Update failed");
                assert!(result.is_none());
                assert!(db.get_all_notes().expect("Query failed").is_empty());
            }

            it "overwrites title and content and refreshes the timestamp" {
                let created = create_test_note(&db, "Old");

                let updated = db.update_note(created.id, NoteInput::new("New", "Fresh"))
                    .expect("Update failed")
                    .expect("Note should exist");

                assert_eq!(updated.id, created.id);
                assert_eq!(updated.title, "New");
                assert_eq!(updated.content, "Fresh");
                assert!(updated.last_modified >= created.last_modified);

                let stored = db.get_note(created.id).expect("Query failed");
                assert_eq!(stored, Some(updated));
            }
        }

        describe "delete_note" {
            it "returns false for a missing id" {
                assert!(!db.delete_note(999).expect("Delete failed"));
            }

            it "removes the note" {
                let note = create_test_note(&db, "Doomed");
                assert!(db.delete_note(note.id).expect("Delete failed"));
                assert!(db.get_note(note.id).expect("Query failed").is_none());
            }

            it "reports false on a second delete" {
                let note = create_test_note(&db, "Doomed");
                assert!(db.delete_note(note.id).expect("Delete failed"));
                assert!(!db.delete_note(note.id).expect("Delete failed"));
            }

            it "leaves other notes alone" {
                let keep = create_test_note(&db, "Keep");
                let doomed = create_test_note(&db, "Drop");
                db.delete_note(doomed.id).expect("Delete failed");

                let notes = db.get_all_notes().expect("Query failed");
                assert_eq!(notes, vec![keep]);
            }
        }

        describe "schema constraints" {
            it "rejects a title the validation rules would reject" {
                let result = db.create_note(NoteInput::new("x".repeat(101), "body"));
                assert!(result.is_err());
                assert!(db.get_all_notes().expect("Query failed").is_empty());
            }
        }
    }

    describe "shared handles" {
        it "sees writes made through a clone" {
            let other = db.clone();
            let note = create_test_note(&other, "Shared");
            assert_eq!(db.get_note(note.id).expect("Query failed"), Some(note));
        }
    }
}

#[test]
fn file_backed_store_does_not_reuse_ids_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("notes.db");

    let last_id = {
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to migrate");
        create_test_note(&db, "One");
        let two = create_test_note(&db, "Two");
        assert!(db.delete_note(two.id).expect("Delete failed"));
        two.id
    };

    let db = Database::open(path).expect("Failed to reopen database");
    db.migrate().expect("Migrations should be idempotent");

    let notes = db.get_all_notes().expect("Query failed");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "One");

    let three = create_test_note(&db, "Three");
    assert!(three.id > last_id);
}
