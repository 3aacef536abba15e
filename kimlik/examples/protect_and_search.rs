//! Basic usage: protect an identifier, search by lookup token, display
//! through the mask.

use kimlik::prelude::*;
use secrecy::SecretVec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Kimlik Basic Usage Example");
    println!("==========================\n");

    // In production the keyring comes from the environment at startup
    // (Keyring::from_env); fixed material keeps the example self-contained.
    let keyring = Keyring::new(
        SecretVec::new(vec![0x42u8; 32]),
        SecretVec::new(b"example-salt-do-not-reuse".to_vec()),
    )?;
    println!("✓ Keyring constructed\n");

    // Protect an identifier on a record.
    let mut nid = ProtectedId::empty();
    nid.set(&keyring, "987-65-4321")?;
    println!("Stored columns:");
    println!("  nid_ciphertext = {}", nid.ciphertext().unwrap());
    println!("  nid_hash       = {}\n", nid.lookup_token().unwrap());

    // Equality search: hash the candidate, compare tokens.
    let candidate = hash_id(&keyring, "987654321")?;
    println!("Candidate token matches: {}\n", Some(&candidate) == nid.lookup_token());

    // Owner-authorized read decrypts on demand.
    let digits = nid.get(&keyring)?.expect("value was set");
    println!("Decrypted: {}", format_id(&digits)?);

    // Everyone else sees the mask.
    println!("Masked:    {}", nid.masked(&keyring)?);

    Ok(())
}
