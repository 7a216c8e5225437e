//! PKCE verifier/challenge pairs for the OAuth redirect flow.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, thread_rng};
use sha2::{Digest, Sha256};

/// Method name the auth API expects alongside an S256 challenge.
pub const CHALLENGE_METHOD: &str = "s256";

#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
}

impl Default for PkceChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl PkceChallenge {
    pub fn new() -> Self {
        let code_verifier = Self::generate_code_verifier();
        let code_challenge = Self::challenge_for(&code_verifier);

        Self {
            code_verifier,
            code_challenge,
        }
    }

    fn generate_code_verifier() -> String {
        let mut rng = thread_rng();
        let bytes: Vec<u8> = (0..64).map(|_| rng.r#gen::<u8>()).collect();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// `BASE64URL(SHA256(verifier))` without padding.
    pub fn challenge_for(verifier: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkce_generation() {
        let first = PkceChallenge::new();
        let second = PkceChallenge::new();

        assert_ne!(first.code_verifier, second.code_verifier);
        assert_ne!(first.code_challenge, second.code_challenge);
        assert_eq!(
            first.code_challenge,
            PkceChallenge::challenge_for(&first.code_verifier)
        );

        // RFC 7636 bounds the verifier to 43..=128 characters
        assert!(first.code_verifier.len() >= 43);
        assert!(first.code_verifier.len() <= 128);
    }

    #[test]
    fn test_known_challenge() {
        // Appendix B of RFC 7636
        assert_eq!(
            PkceChallenge::challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r7wW1gX6q0nCgI"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }
}
