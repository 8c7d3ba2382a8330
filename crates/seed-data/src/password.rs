//! Password hashing for seeded logins.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::db::SeedError;

/// Memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes.
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, SeedError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| SeedError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` with a fresh salt into a PHC string.
pub fn hash_password(password: &str) -> Result<String, SeedError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SeedError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks `password` against a PHC string produced by [`hash_password`].
pub fn verify_password(password: &str, hash: &str) -> Result<bool, SeedError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| SeedError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("123456").unwrap();

        assert_ne!(hash, "123456");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn test_hash_uses_fixed_cost() {
        let hash = hash_password("pw").unwrap();
        let expected = format!("m={MEMORY_COST_KIB},t={TIME_COST},p={PARALLELISM}");

        assert!(hash.contains(&expected), "unexpected params in {hash}");
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }
}
