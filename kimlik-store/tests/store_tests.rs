//! Integration tests against a file-backed database, covering behavior
//! across store re-opens (stand-in for process restarts).

use kimlik::keyring::Keyring;
use kimlik_store::prelude::*;
use secrecy::SecretVec;
use std::sync::Arc;
use tempfile::TempDir;

fn keyring() -> Arc<Keyring> {
    Arc::new(
        Keyring::new(
            SecretVec::new(vec![0x11u8; 32]),
            SecretVec::new(b"file-test-salt".to_vec()),
        )
        .expect("valid key material"),
    )
}

fn new_person(first: &str, nid: &str) -> NewPerson {
    NewPerson {
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{first}@example.com"),
        national_id: nid.to_string(),
    }
}

#[test]
fn test_lookup_survives_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("people.db");

    {
        let store = PersonStore::open(&db, keyring()).unwrap();
        store.insert(&new_person("alice", "987-65-4321")).unwrap();
    }

    // A fresh store with freshly constructed (identical) key material
    // computes the same lookup token: determinism across restarts.
    let store = PersonStore::open(&db, keyring()).unwrap();
    let found = store.find_by_national_id("987654321").unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().first_name, "alice");
}

#[test]
fn test_wrong_salt_cannot_find_rows() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("people.db");

    {
        let store = PersonStore::open(&db, keyring()).unwrap();
        store.insert(&new_person("alice", "987-65-4321")).unwrap();
    }

    let other_keyring = Arc::new(
        Keyring::new(
            SecretVec::new(vec![0x11u8; 32]),
            SecretVec::new(b"a-different-salt".to_vec()),
        )
        .unwrap(),
    );
    let store = PersonStore::open(&db, other_keyring).unwrap();

    // The token no longer matches; equality search finds nothing rather
    // than returning a wrong row.
    let found = store.find_by_national_id("987654321").unwrap();
    assert!(found.is_none());
}

#[test]
fn test_batch_seed_then_query() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("people.db");

    let people: Vec<NewPerson> = (0..50)
        .map(|i| new_person(&format!("p{i}"), &format!("{:09}", 100_000_000 + i)))
        .collect();

    let mut store = PersonStore::open(&db, keyring()).unwrap();
    assert_eq!(store.insert_batch(&people).unwrap(), 50);
    assert_eq!(store.count().unwrap(), 50);

    let found = store.find_by_national_id("100000017").unwrap().unwrap();
    assert_eq!(found.first_name, "p17");
}

#[test]
fn test_person_and_applicant_tables_coexist() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("mixed.db");
    let keys = keyring();

    let people = PersonStore::open(&db, Arc::clone(&keys)).unwrap();
    people.insert(&new_person("alice", "123456789")).unwrap();

    let applicants = ApplicantStore::open(&db, keys).unwrap();
    applicants.insert("bob", "bob@example.com", 75_000.0).unwrap();

    assert!(people.find_by_national_id("123-45-6789").unwrap().is_some());
    assert_eq!(applicants.incomes_above(50_000.0).unwrap().len(), 1);
}
