use serde::Serialize;

/// Cryptographic strength tier for DNSSEC algorithms and digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Deprecated,
    Weak,
    Acceptable,
    Strong,
}

/// DNSKEY/DS algorithm numbers (IANA DNS Security Algorithm Numbers).
pub fn classify_algorithm(number: u8) -> Option<(&'static str, Strength)> {
    match number {
        1 => Some(("RSA/MD5", Strength::Deprecated)),
        3 => Some(("DSA/SHA-1", Strength::Deprecated)),
        5 => Some(("RSA/SHA-1", Strength::Weak)),
        6 => Some(("DSA-NSEC3-SHA1", Strength::Deprecated)),
        7 => Some(("RSASHA1-NSEC3-SHA1", Strength::Weak)),
        8 => Some(("RSA/SHA-256", Strength::Acceptable)),
        10 => Some(("RSA/SHA-512", Strength::Acceptable)),
        13 => Some(("ECDSA P-256/SHA-256", Strength::Strong)),
        14 => Some(("ECDSA P-384/SHA-384", Strength::Strong)),
        15 => Some(("Ed25519", Strength::Strong)),
        16 => Some(("Ed448", Strength::Strong)),
        _ => None,
    }
}

/// DS digest type numbers (IANA Delegation Signer Digest Algorithms).
pub fn classify_digest(number: u8) -> Option<(&'static str, Strength)> {
    match number {
        1 => Some(("SHA-1", Strength::Weak)),
        2 => Some(("SHA-256", Strength::Strong)),
        3 => Some(("GOST R 34.11-94", Strength::Deprecated)),
        4 => Some(("SHA-384", Strength::Strong)),
        _ => None,
    }
}
