//! Argon2 password hashing

use anyhow::{Context, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};

/// Hashes and verifies passwords as PHC strings
#[derive(Clone, Default)]
pub struct Passwords {
    argon2: Argon2<'static>,
}

impl Passwords {
    /// Hashes `password` with a fresh random salt
    pub fn hash(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("unable to hash password: {e}"))?;
        Ok(hash.to_string())
    }

    /// Ok(false) when the password does not match. Err when `hash` is not a valid PHC string.
    pub fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| anyhow!("stored password hash is invalid: {e}"))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow!("unable to verify password: {e}")),
        }
    }

    /// [Passwords::hash] on the blocking thread pool
    pub async fn hash_in_background(&self, password: String) -> anyhow::Result<String> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .context("password hashing task failed")?
    }

    /// [Passwords::verify] on the blocking thread pool
    pub async fn verify_in_background(
        &self,
        password: String,
        hash: String,
    ) -> anyhow::Result<bool> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .context("password verification task failed")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_verifies_its_own_hashes() {
        let passwords = Passwords::default();
        let hash = passwords.hash("admin123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify("admin123", &hash).unwrap());
        assert!(!passwords.verify("admin124", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let passwords = Passwords::default();
        assert_ne!(
            passwords.hash("admin123").unwrap(),
            passwords.hash("admin123").unwrap()
        );
    }

    #[tokio::test]
    async fn background_hashes_verify() {
        let passwords = Passwords::default();
        let hash = passwords
            .hash_in_background("admin123".to_string())
            .await
            .unwrap();

        assert!(passwords.verify("admin123", &hash).unwrap());
        assert!(
            passwords
                .verify_in_background("admin123".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !passwords
                .verify_in_background("admin124".to_string(), hash)
                .await
                .unwrap()
        );
    }

    #[test]
    fn garbage_hashes_are_errors() {
        assert!(Passwords::default().verify("admin123", "admin123").is_err());
    }
}
