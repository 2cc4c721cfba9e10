// エラーハンドリング
pub mod error;
// 素数判定・素数生成
pub mod prime;
// RSA鍵ペアとトラップドア関数
pub mod rsa;
// リング署名関連
pub mod ring;
// 暗号ユーティリティ
pub mod crypto_utils;
// 定数
pub mod constants;
// CLI用モデル
pub mod models;
// シリアライゼーションヘルパー
pub mod serialization;

#[cfg(test)]
mod test_utils;

pub use error::{RingError, RsaError};
pub use models::CliSignaturePayload;
pub use prime::is_probably_prime;
pub use ring::{ring_sign, ring_verify, ring_verify_values, RingSignature};
pub use rsa::{generate_keypair, public_ring, KeyPair, PublicKey, SecretKey};
pub use serialization::{biguint_to_hex, hex_to_biguint};
