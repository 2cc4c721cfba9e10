use crate::constants::DIGEST_BITS;
use log::{debug, trace};
use num_bigint::BigUint;
use rand::RngCore;
// ハッシュ関数 (SHA3-256)
use sha3::{Digest, Sha3_256};

// 鍵 k をハッシュに入力する際の固定バイト長
const KEY_BYTES: usize = DIGEST_BITS / 8;

/// 値を指定バイト長のビッグエンディアン列に変換する
/// 短い場合は先頭をゼロで埋め、長い場合は下位 len バイトを残す
pub fn to_fixed_be(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    if bytes.len() < len {
        let mut padded = vec![0u8; len - bytes.len()];
        padded.extend_from_slice(&bytes);
        padded
    } else {
        bytes[bytes.len() - len..].to_vec()
    }
}

/// [0, 2^bits) から一様な乱数を取り出す
/// 乱数源の失敗はそのまま呼び出し元へ返す
pub fn random_bits<R: RngCore + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint, rand::Error> {
    if bits == 0 {
        return Ok(BigUint::default());
    }
    let num_bytes = (bits + 7) / 8;
    let mut buf = vec![0u8; num_bytes];
    rng.try_fill_bytes(&mut buf)?;
    // 余分な上位ビットを落とす
    let extra = num_bytes * 8 - bits;
    buf[0] &= 0xffu8 >> extra;
    Ok(BigUint::from_bytes_be(&buf))
}

/// メッセージのダイジェストを整数として返す (置換 E の鍵 k)
pub fn message_key(m: &[u8]) -> BigUint {
    let hash = Sha3_256::digest(m);
    debug!("message_key: hash = {:?}", hash);
    BigUint::from_bytes_be(&hash)
}

/// 鍵付き置換 E_k(x)
/// k を固定長で先頭に置き、x のバイト列を続けて SHA3-256 を取る
pub fn e_k(k: &BigUint, x: &BigUint) -> BigUint {
    trace!("e_k: k = {}, x = {}", k, x);
    let mut hasher = Sha3_256::new();
    hasher.update(to_fixed_be(k, KEY_BYTES));
    hasher.update(x.to_bytes_be());
    let result = BigUint::from_bytes_be(&hasher.finalize());
    trace!("e_k: result = {}", result);
    result
}
