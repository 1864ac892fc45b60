use base64::Engine;
use serde::Serialize;

use crate::common::tags::{get_tag, parse_tag_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Rsa,
    Ed25519,
}

/// A DKIM public key record as published at `<selector>._domainkey.<domain>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DkimKey {
    pub key_type: KeyType,
    /// Empty `p=` means the key was revoked (RFC 6376 section 3.6.1).
    pub revoked: bool,
    /// Estimated key size in bits; `None` when the key material does not
    /// decode or the key is revoked.
    pub key_bits: Option<u32>,
}

impl DkimKey {
    /// Parse a DKIM key TXT record. Returns `None` when the record carries
    /// no `p=` tag at all (not a key record).
    pub fn parse(record: &str) -> Option<Self> {
        let tags = parse_tag_list(record);

        // v= is optional on key records but must be DKIM1 when present.
        if let Some(v) = get_tag(&tags, "v") {
            if !v.eq_ignore_ascii_case("DKIM1") {
                return None;
            }
        }

        let p = get_tag(&tags, "p")?;

        let key_type = match get_tag(&tags, "k") {
            Some(k) if k.eq_ignore_ascii_case("ed25519") => KeyType::Ed25519,
            _ => KeyType::Rsa,
        };

        if p.is_empty() {
            return Some(DkimKey {
                key_type,
                revoked: true,
                key_bits: None,
            });
        }

        let cleaned: String = p.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let key_bits = base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .ok()
            .map(|decoded| match key_type {
                KeyType::Ed25519 => 256,
                KeyType::Rsa => estimate_rsa_bits(decoded.len()),
            });

        Some(DkimKey {
            key_type,
            revoked: false,
            key_bits,
        })
    }
}

/// Estimate an RSA key size from the length of its DER-encoded
/// SubjectPublicKeyInfo. Reference lengths: 1024-bit keys encode to 162
/// bytes, 2048-bit to 294, 4096-bit to 550; thresholds sit just below each.
pub fn estimate_rsa_bits(der_len: usize) -> u32 {
    if der_len >= 526 {
        4096
    } else if der_len >= 270 {
        2048
    } else if der_len >= 158 {
        1024
    } else {
        512
    }
}
