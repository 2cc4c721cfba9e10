use crate::ring::RingSignature;
use crate::rsa::PublicKey;
use crate::serialization::{biguint_to_hex, hex_to_biguint};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Structure for CLI signature output via JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct CliSignaturePayload {
    /// Ring signature glue value (hex string)
    pub c: String,
    /// Per-member ring signature values (hex strings), one per ring index
    pub s: Vec<String>,
    /// Ring public keys as (e, n) hex pairs, in ring order
    pub ring: Vec<(String, String)>,
    /// Original message signed
    pub message: String,
}

impl CliSignaturePayload {
    pub fn new(sig: &RingSignature, ring: &[PublicKey], message: &str) -> Self {
        CliSignaturePayload {
            c: biguint_to_hex(&sig.c),
            s: sig.s.iter().map(biguint_to_hex).collect(),
            ring: ring
                .iter()
                .map(|pk| (biguint_to_hex(&pk.e), biguint_to_hex(&pk.n)))
                .collect(),
            message: message.to_string(),
        }
    }

    /// Decodes the hex fields back into a signature and its ring.
    pub fn decode(&self) -> Result<(RingSignature, Vec<PublicKey>)> {
        let sig = RingSignature {
            c: hex_to_biguint(&self.c)?,
            s: self
                .s
                .iter()
                .map(|s| hex_to_biguint(s))
                .collect::<Result<_>>()?,
        };
        let ring = self
            .ring
            .iter()
            .map(|(e, n)| -> Result<PublicKey> {
                Ok(PublicKey {
                    e: hex_to_biguint(e)?,
                    n: hex_to_biguint(n)?,
                })
            })
            .collect::<Result<_>>()?;
        Ok((sig, ring))
    }
}
