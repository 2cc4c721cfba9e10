use thiserror::Error;

#[derive(Error, Debug)]
pub enum RsaError {
    #[error("invalid key bit length: {0}")]
    InvalidBitLength(usize),
    #[error("random number generator failed: {0}")]
    Entropy(String),
}

#[derive(Error, Debug)]
pub enum RingError {
    #[error("ring is empty")]
    EmptyRing,
    #[error("invalid signer index {index} for ring of size {size}")]
    InvalidSignerIndex { index: usize, size: usize },
    #[error("ring member {index} has an invalid public key (zero modulus or exponent)")]
    InvalidPublicKey { index: usize },
    #[error("signer secret key does not match ring member public key")]
    KeyMismatch,
    #[error("malformed signature: expected {expected} values, got {actual}")]
    MalformedSignature { expected: usize, actual: usize },
    #[error("ring member {index} has a {modulus_bits}-bit modulus, shorter than bit length {bit_length}")]
    DomainTooWide {
        index: usize,
        modulus_bits: u64,
        bit_length: usize,
    },
    #[error("bit length {0} is too small for the message digest")]
    BitLengthTooSmall(usize),
    #[error("random number generator failed: {0}")]
    Entropy(String),
}
