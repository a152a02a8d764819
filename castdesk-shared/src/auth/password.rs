/// Password hashing using Argon2id
///
/// Castdesk stores credentials as Argon2id hashes in PHC string format. The
/// parameters (64 MB memory, 3 passes, 4 lanes) follow current OWASP guidance
/// for interactive logins.
///
/// # Example
///
/// ```
/// use castdesk_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("s3cret-Passw0rd!")?;
/// assert!(verify_password("s3cret-Passw0rd!", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash a password
    #[error("Failed to hash password: {0}")]
    Hash(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Verification failed for a reason other than a wrong password
    #[error("Failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// Returns a PHC-format string (`$argon2id$v=19$m=65536,t=3,p=4$...`) that
/// embeds algorithm, parameters, and salt, so verification needs no extra
/// configuration.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if hashing fails. This does not happen for
/// well-formed input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::Hash(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time (provided by the `argon2` crate). A wrong
/// password returns `Ok(false)`, never an error; only an unparseable or
/// corrupted stored hash produces an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the PHC string
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(format!("Verification failed: {}", e))),
    }
}

/// Validates password strength for registration
///
/// Requires at least 8 characters with an uppercase letter, a lowercase
/// letter, a digit, and a non-alphanumeric character. Returns a message
/// suitable for a 422 validation detail.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_format() {
        let hash = hash_password("casting-desk-1!").expect("hash should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let h1 = hash_password("same").unwrap();
        let h2 = hash_password("same").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_verify_roundtrip() {
        for password in ["simple", "with spaces", "unicode-æøå-密码", "!@#$%^&*()"] {
            let hash = hash_password(password).unwrap();
            assert!(verify_password(password, &hash).unwrap());
        }
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct").unwrap();
        assert!(!verify_password("incorrect", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash_is_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
        assert!(verify_password("anything", "$argon2id$truncated").is_err());
    }

    #[test]
    fn test_strength_rules() {
        assert!(validate_password_strength("CastDesk1!").is_ok());
        assert!(validate_password_strength("Sh0rt!").is_err());
        assert!(validate_password_strength("lowercase1!").is_err());
        assert!(validate_password_strength("UPPERCASE1!").is_err());
        assert!(validate_password_strength("NoDigits!!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }
}
