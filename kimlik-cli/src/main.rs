//! `kimlik` CLI: key material generation, one-off transforms, test-data
//! seeding, and a small query benchmark.
//!
//! Key material is read from the environment (`KIMLIK_ENCRYPTION_KEY`,
//! `KIMLIK_HASH_SALT`); `keygen` prints fresh values but never persists
//! them. Record-oriented output goes through the masking transform; only
//! the explicit `decrypt` subcommand ever prints a plaintext identifier.

#![warn(clippy::pedantic, clippy::nursery)]

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use kimlik::cipher::{decrypt_id, encrypt_id, Ciphertext};
use kimlik::keyring::{Keyring, KEY_ENV, KEY_SIZE, SALT_ENV};
use kimlik::lookup::hash_id;
use kimlik::mask::mask;
use kimlik_store::prelude::*;
use rand::{rngs::OsRng, Rng, RngCore};
use secrecy::SecretVec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "kimlik")]
#[command(about = "Column encryption for identity numbers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fresh key material and print it (never persisted)
    Keygen,
    /// Encrypt an identifier into a ciphertext token
    Encrypt {
        /// Identifier in any separator format
        value: String,
    },
    /// Decrypt a ciphertext token back to the canonical digits
    Decrypt {
        /// Base64 token produced by `encrypt`
        token: String,
    },
    /// Compute the equality-search lookup token for an identifier
    Hash {
        /// Identifier in any separator format
        value: String,
    },
    /// Mask an identifier for display
    Mask {
        /// Identifier in any separator format
        value: String,
    },
    /// Seed a database with synthetic people
    Seed {
        /// Database file
        #[arg(short, long, default_value = "./kimlik.db")]
        db: PathBuf,
        /// Number of records to generate
        #[arg(short, long, default_value_t = 10_000)]
        count: usize,
    },
    /// Find a person by identifier via the indexed lookup token
    Find {
        /// Database file
        #[arg(short, long, default_value = "./kimlik.db")]
        db: PathBuf,
        /// Identifier in any separator format
        value: String,
    },
    /// Compare indexed equality lookup against a decrypt-all range scan
    Bench {
        /// Rows to seed into each in-memory table
        #[arg(short, long, default_value_t = 10_000)]
        count: usize,
        /// Query iterations per strategy
        #[arg(short, long, default_value_t = 100)]
        iterations: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Keygen => keygen(),
        Commands::Encrypt { value } => {
            let keyring = keyring_from_env()?;
            println!("{}", encrypt_id(&keyring, &value)?);
            Ok(())
        }
        Commands::Decrypt { token } => {
            let keyring = keyring_from_env()?;
            let digits = decrypt_id(&keyring, &Ciphertext::from_stored(token))?;
            println!("{}", &*digits);
            Ok(())
        }
        Commands::Hash { value } => {
            let keyring = keyring_from_env()?;
            println!("{}", hash_id(&keyring, &value)?);
            Ok(())
        }
        Commands::Mask { value } => {
            println!("{}", mask(&value));
            Ok(())
        }
        Commands::Seed { db, count } => seed(&db, count),
        Commands::Find { db, value } => find(&db, &value),
        Commands::Bench { count, iterations } => bench(count, iterations),
    }
}

fn keyring_from_env() -> anyhow::Result<Arc<Keyring>> {
    Ok(Arc::new(Keyring::from_env().context("loading key material from the environment")?))
}

fn keygen() -> anyhow::Result<()> {
    let mut key = [0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut key);
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);

    // The salt is an arbitrary secret string; base64 keeps it printable.
    println!("export {KEY_ENV}={}", STANDARD.encode(key));
    println!("export {SALT_ENV}={}", STANDARD.encode(salt));
    Ok(())
}

fn seed(db: &Path, count: usize) -> anyhow::Result<()> {
    let keyring = keyring_from_env()?;
    let mut store = PersonStore::open(db, keyring)?;

    let people = synthetic_people(count);
    let started = Instant::now();
    let inserted = store.insert_batch(&people)?;

    println!(
        "seeded {inserted} people into {} in {:.1}s (total rows: {})",
        db.display(),
        started.elapsed().as_secs_f64(),
        store.count()?
    );
    if let Some(first) = people.first() {
        println!("sample lookup value: {}", mask(&first.national_id));
    }
    Ok(())
}

fn find(db: &Path, value: &str) -> anyhow::Result<()> {
    let keyring = keyring_from_env()?;
    let store = PersonStore::open(db, Arc::clone(&keyring))?;

    match store.find_by_national_id(value)? {
        Some(person) => {
            println!(
                "#{} {} {} <{}> nid {}",
                person.id,
                person.first_name,
                person.last_name,
                person.email,
                person.national_id.masked(&keyring)?
            );
        }
        None => println!("no match"),
    }
    Ok(())
}

fn bench(count: usize, iterations: usize) -> anyhow::Result<()> {
    anyhow::ensure!(count > 0, "count must be at least 1");

    // Ephemeral key material: the benchmark never touches real data.
    let mut key = vec![0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut key);
    let keyring = Arc::new(Keyring::new(
        SecretVec::new(key),
        SecretVec::new(b"bench-salt".to_vec()),
    )?);

    let people = synthetic_people(count);
    let mut person_store = PersonStore::open_in_memory(Arc::clone(&keyring))?;
    person_store.insert_batch(&people)?;

    let applicant_store = ApplicantStore::open_in_memory(Arc::clone(&keyring))?;
    let mut rng = rand::thread_rng();
    for i in 0..count {
        applicant_store.insert(
            &format!("applicant{i}"),
            &format!("applicant{i}@example.com"),
            rng.gen_range(5_000.0..250_000.0),
        )?;
    }

    println!("seeded {count} rows per table, {iterations} iterations per strategy\n");

    // Strategy 1: equality by indexed lookup token.
    let mut times = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let target = &people[rng.gen_range(0..people.len())].national_id;
        let started = Instant::now();
        let hit = person_store.find_by_national_id(target)?;
        times.push(started.elapsed().as_secs_f64() * 1000.0);
        anyhow::ensure!(hit.is_some(), "seeded value must be found");
    }
    report("equality via nid_hash index", &times);

    // Strategy 2: range query forcing the decrypt-all scan.
    let mut times = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let threshold = rng.gen_range(5_000.0..250_000.0);
        let started = Instant::now();
        let _hits = applicant_store.incomes_above(threshold)?;
        times.push(started.elapsed().as_secs_f64() * 1000.0);
    }
    report("range via decrypt-all scan", &times);

    Ok(())
}

fn report(name: &str, times_ms: &[f64]) {
    let total: f64 = times_ms.iter().sum();
    let min = times_ms.iter().copied().fold(f64::INFINITY, f64::min);
    let max = times_ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    println!("{name}:");
    println!(
        "  avg {:.3} ms  min {min:.3} ms  max {max:.3} ms",
        total / times_ms.len() as f64
    );
}

fn synthetic_people(count: usize) -> Vec<NewPerson> {
    // Sequential identifiers from a random start keep the set unique and
    // inside the 9-digit space.
    let start: u64 = rand::thread_rng().gen_range(100_000_000..999_999_999 - count as u64);
    (0..count)
        .map(|i| NewPerson {
            first_name: format!("First{i}"),
            last_name: format!("Last{i}"),
            email: format!("person{i}@example.com"),
            national_id: format!("{:09}", start + i as u64),
        })
        .collect()
}
