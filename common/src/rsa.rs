use crate::constants;
use crate::error::RsaError;
use crate::prime::generate_prime;
use anyhow::Result;
use log::{debug, info, trace};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;

// RSA公開鍵を表す構造体
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    // モジュラス (法)
    pub n: BigUint,
    // 公開指数
    pub e: BigUint,
}

// RSA秘密鍵を表す構造体
#[derive(Clone, Debug)]
pub struct SecretKey {
    // 秘密指数
    pub d: BigUint,
    // モジュラス (公開鍵と共通)
    pub n: BigUint,
}

// RSA鍵ペア (公開鍵と秘密鍵) を表す構造体
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

/// 鍵ペアのリストから公開鍵だけを取り出す (検証者と共有するリング)
pub fn public_ring(keypairs: &[KeyPair]) -> Vec<PublicKey> {
    keypairs.iter().map(|kp| kp.public.clone()).collect()
}

/// RSAトラップドア関数 g(x) = x^e mod n
pub fn g(pubkey: &PublicKey, x: &BigUint) -> BigUint {
    // 内部不変条件: n > 0
    assert!(!pubkey.n.is_zero(), "RSA公開鍵nが0です");
    let result = x.modpow(&pubkey.e, &pubkey.n);
    trace!("g: x = {}, result = {}", x, result);
    result
}

/// トラップドアの逆関数 g⁻¹(y) = y^d mod n (秘密鍵の所有者のみ計算可能)
pub fn g_inverse(secret: &SecretKey, y: &BigUint) -> BigUint {
    // 内部不変条件: n > 0
    assert!(!secret.n.is_zero(), "RSA秘密鍵nが0です");
    let result = y.modpow(&secret.d, &secret.n);
    trace!("g_inverse: y = {}, result = {}", y, result);
    result
}

fn next_prime<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint> {
    generate_prime(bits, constants::MILLER_RABIN_ROUNDS, rng)
}

/// 素数 p, q と秘密指数 d を生成する
/// e と φ(n) が互いに素でない場合や、n がちょうど bits ビットにならない場合は素数を引き直す
pub(crate) fn generate_key_material<R: Rng + ?Sized>(
    bits: usize,
    rng: &mut R,
) -> Result<(BigUint, BigUint, BigUint)> {
    if bits < 16 || bits % 2 != 0 {
        return Err(RsaError::InvalidBitLength(bits).into());
    }
    let half = bits / 2;
    let e = BigUint::from(constants::E);

    let mut p = next_prime(half, rng)?;
    let mut q = next_prime(half, rng)?;
    loop {
        // e は素数なので、e | p-1 または e | q-1 のときに限り逆元が存在しない
        if ((&p - BigUint::one()) % &e).is_zero() {
            debug!("generate_key_material: e が p-1 を割り切るため p を再生成");
            p = next_prime(half, rng)?;
            continue;
        }
        if ((&q - BigUint::one()) % &e).is_zero() || q == p {
            debug!("generate_key_material: q を再生成");
            q = next_prime(half, rng)?;
            continue;
        }
        // モジュラスのビット長が足りない場合は両方を引き直す
        if (&p * &q).bits() != bits as u64 {
            debug!("generate_key_material: n のビット長不足のため p, q を再生成");
            p = next_prime(half, rng)?;
            q = next_prime(half, rng)?;
            continue;
        }

        // オイラーのトーシェント関数 φ(n) = (p-1)*(q-1) を計算
        let phi = (&p - BigUint::one()) * (&q - BigUint::one());
        match e.modinv(&phi) {
            Some(d) => return Ok((p, q, d)),
            None => {
                debug!("generate_key_material: 逆元が存在しないため q を再生成");
                q = next_prime(half, rng)?;
            }
        }
    }
}

/// RSA鍵ペア生成
/// bits: モジュラス n のビット長 (素数p, qはそれぞれ bits/2 ビット)
/// rng: 乱数生成器
pub fn generate_keypair<R: Rng + ?Sized>(bits: usize, rng: &mut R) -> Result<KeyPair> {
    info!("RSA鍵ペア生成開始: bits = {}", bits);
    let (p, q, d) = generate_key_material(bits, rng)?;
    let n = &p * &q;
    debug!("generate_keypair: n = {}", n);

    let keypair = KeyPair {
        public: PublicKey {
            n: n.clone(),
            e: BigUint::from(constants::E),
        },
        secret: SecretKey { d, n },
    };
    info!("RSA鍵ペア生成完了: n bits = {}", keypair.public.n.bits());
    Ok(keypair)
}
