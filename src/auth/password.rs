use crate::error::Error;

pub fn hash(password: &str, cost: u32) -> Result<String, Error> {
    Ok(bcrypt::hash(password, cost)?)
}

/// A malformed stored hash counts as a mismatch rather than an error.
pub fn verify(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or_else(|err| {
        tracing::warn!("could not verify password hash: {}", err);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash("s3cret-passw0rd", 4).unwrap();

        assert!(hashed.starts_with("$2"));
        assert!(verify("s3cret-passw0rd", &hashed));
        assert!(!verify("wrong-password", &hashed));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify("anything", "not-a-bcrypt-hash"));
    }
}
