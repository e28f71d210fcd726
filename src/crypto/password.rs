use crate::error::{AppError, Result};
use argon2::{
    Argon2, Params, ParamsBuilder,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;

fn production_params() -> Result<Params> {
    ParamsBuilder::new()
        .m_cost(ARGON2_MEMORY_MB * 1024)
        .t_cost(ARGON2_ITERATIONS)
        .p_cost(ARGON2_PARALLELISM)
        .build()
        .map_err(|e| AppError::Hash(format!("Argon2 params: {}", e)))
}

fn hash_with_params(password: &str, params: Params) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Hash(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Hash(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Hashes a password using Argon2id. A fresh random salt is generated per
/// call and embedded in the PHC output string, so verification needs no
/// side channel.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password.
pub fn hash_password(password: &str) -> Result<String> {
    let hash = hash_with_params(password, production_params()?)?;
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(hash)
}

/// Verifies a password against a stored hash. The comparison inside
/// `verify_password` is constant-time; a mismatch is `Ok(false)`, while a
/// malformed stored hash is an error (stored data corruption).
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Hash(format!("Hash parse error: {}", e)))?;
    let argon2 = Argon2::default();
    let result = argon2.verify_password(&password_bytes, &parsed_hash).is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    // Minimal-cost params keep the sampled property test fast; the
    // algorithm and salt handling are identical to production.
    fn cheap_params() -> Params {
        ParamsBuilder::new()
            .m_cost(8)
            .t_cost(1)
            .p_cost(1)
            .build()
            .unwrap()
    }

    fn random_password(len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    #[test]
    fn round_trip_with_production_params() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("correct horse battery stable", &hash).unwrap());
    }

    #[test]
    fn hashes_embed_a_fresh_salt() {
        let a = hash_with_params("same password", cheap_params()).unwrap();
        let b = hash_with_params("same password", cheap_params()).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same password", &a).unwrap());
        assert!(verify_password("same password", &b).unwrap());
    }

    #[test]
    fn verify_matches_only_the_original_password() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let password = random_password(rng.gen_range(1..=32));
            let mut other = random_password(rng.gen_range(1..=32));
            if other == password {
                other.push('x');
            }

            let hash = hash_with_params(&password, cheap_params()).unwrap();
            assert!(verify_password(&password, &hash).unwrap());
            assert!(!verify_password(&other, &hash).unwrap());
        }
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let err = verify_password("whatever", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::Hash(_)));
    }
}
