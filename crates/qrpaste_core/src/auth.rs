//! Password hashing and submitter fingerprinting.

use crate::error::AppError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Key-derivation context for submitter fingerprints; bump the suffix if
/// the fingerprint scheme ever changes, to invalidate old index rows.
const FINGERPRINT_CONTEXT: &str = "qrpaste submitter fingerprint v1";

/// Hash a password into a PHC string for storage.
///
/// # Errors
/// Returns [`AppError::PasswordHash`] if hashing fails; the raw password
/// never appears in the error.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::PasswordHash)
}

/// Verify a password against a stored PHC hash string.
///
/// Verification is constant-time; an unparsable stored hash verifies as
/// false rather than erroring, so a corrupt row behaves like a wrong
/// password instead of leaking storage detail.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Apply the retrieval gate for a stored credential.
///
/// Both denial outcomes carry the same uniform message; only the variant
/// (and so the HTTP status) differs. An empty supplied password counts
/// as no credential.
///
/// # Errors
/// [`AppError::Unauthorized`] when a credential is required but missing,
/// [`AppError::Forbidden`] when the supplied credential is wrong.
pub fn authorize_fetch(
    stored_hash: Option<&str>,
    supplied: Option<&str>,
) -> Result<(), AppError> {
    let Some(hash) = stored_hash else {
        return Ok(());
    };
    match supplied {
        None => Err(AppError::Unauthorized),
        Some(password) if password.is_empty() => Err(AppError::Unauthorized),
        Some(password) => {
            if verify_password(password, hash) {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Privacy-preserving fingerprint of a submitter address.
///
/// The address is keyed-hashed under a key derived from the server
/// secret; the raw address never leaves this function and cannot be
/// recovered from the fingerprint without the secret.
pub fn fingerprint(secret: &str, client_addr: &str) -> String {
    let key = blake3::derive_key(FINGERPRINT_CONTEXT, secret.as_bytes());
    blake3::keyed_hash(&key, client_addr.as_bytes())
        .to_hex()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{authorize_fetch, fingerprint, hash_password, verify_password};
    use crate::error::AppError;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same input").expect("hash");
        let b = hash_password("same input").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_stored_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn public_paste_needs_no_credential() {
        assert!(authorize_fetch(None, None).is_ok());
        assert!(authorize_fetch(None, Some("ignored")).is_ok());
    }

    #[test]
    fn protected_paste_gates_on_credential() {
        let hash = hash_password("sekret99").expect("hash");

        assert!(matches!(
            authorize_fetch(Some(&hash), None),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize_fetch(Some(&hash), Some("")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize_fetch(Some(&hash), Some("wrong")),
            Err(AppError::Forbidden)
        ));
        assert!(authorize_fetch(Some(&hash), Some("sekret99")).is_ok());
    }

    #[test]
    fn fingerprint_is_stable_and_secret_dependent() {
        let a = fingerprint("secret-a", "203.0.113.7");
        assert_eq!(a, fingerprint("secret-a", "203.0.113.7"));
        assert_ne!(a, fingerprint("secret-b", "203.0.113.7"));
        assert_ne!(a, fingerprint("secret-a", "203.0.113.8"));
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|b| b.is_ascii_hexdigit()));
    }
}
