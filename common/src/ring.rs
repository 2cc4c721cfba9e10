use crate::constants::DIGEST_BITS;
use crate::crypto_utils::{e_k, message_key, random_bits};
use crate::error::RingError;
use crate::rsa::{g, g_inverse, PublicKey, SecretKey};
use anyhow::Result;
use log::{debug, error, info};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;
use std::vec::Vec;

// リング署名を表す構造体
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingSignature {
    // グルー値 c (インデックス n-1 の直後の環の値。検証の起点)
    pub c: BigUint,
    // 各リングメンバーの値 s_i (リングのインデックス順)
    pub s: Vec<BigUint>,
}

impl RingSignature {
    /// [c, s_0, ..., s_{n-1}] の平坦な列に変換する
    pub fn to_values(&self) -> Vec<BigUint> {
        std::iter::once(self.c.clone())
            .chain(self.s.iter().cloned())
            .collect()
    }

    /// 平坦な列から署名を復元する。空の列の場合は None
    pub fn from_values(values: &[BigUint]) -> Option<Self> {
        values.split_first().map(|(c, s)| RingSignature {
            c: c.clone(),
            s: s.to_vec(),
        })
    }
}

/// 署名者の次のメンバーから始めて、署名者以外の全インデックスを巡回する順序
pub fn walk_order(signer: usize, n: usize) -> impl Iterator<Item = usize> {
    (1..n).map(move |offset| (signer + offset) % n)
}

/// モジュラスまたは公開指数が 0 のメンバーを拒否する
fn check_public_keys(ring: &[PublicKey]) -> Result<()> {
    if let Some(index) = ring
        .iter()
        .position(|pk| pk.n.is_zero() || pk.e.is_zero())
    {
        error!("メンバー {} の公開鍵が不正です (n または e が 0)。", index);
        return Err(RingError::InvalidPublicKey { index }.into());
    }
    Ok(())
}

fn sample(bits: usize, rng: &mut (impl RngCore + ?Sized)) -> Result<BigUint> {
    random_bits(bits, rng).map_err(|err| RingError::Entropy(err.to_string()).into())
}

/// リング署名生成
/// ring: リングメンバーの公開鍵リスト
/// signer: 署名者のインデックス
/// signer_secret: 署名者の秘密鍵
/// m: 署名対象のメッセージ
/// b: 共通ビット長 L (乱数は [0, 2^(b-1)) から選ぶ)
/// rng: 乱数生成器
pub fn ring_sign<R: RngCore + ?Sized>(
    ring: &[PublicKey],
    signer: usize,
    signer_secret: &SecretKey,
    m: &[u8],
    b: usize,
    rng: &mut R,
) -> Result<RingSignature> {
    // infoには主要パラメータのみ、詳細はdebugで出力
    info!(
        "リング署名生成開始: ring_size = {}, signer = {}, m_len = {}, b = {}",
        ring.len(),
        signer,
        m.len(),
        b
    );

    // リングが空の場合エラー
    if ring.is_empty() {
        error!("リングが空です。署名を生成できません。");
        return Err(RingError::EmptyRing.into());
    }
    // 署名者インデックスが無効な場合エラー
    if signer >= ring.len() {
        error!(
            "署名者のインデックス {} がリングサイズ {} を超えています。",
            signer,
            ring.len()
        );
        return Err(RingError::InvalidSignerIndex {
            index: signer,
            size: ring.len(),
        }
        .into());
    }
    check_public_keys(ring)?;
    if signer_secret.n != ring[signer].n {
        error!("署名者の秘密鍵がリングの公開鍵と一致しません。");
        return Err(RingError::KeyMismatch.into());
    }
    // E の出力 (DIGEST_BITS ビット) が [0, 2^(b-1)) に収まる必要がある
    if b <= DIGEST_BITS {
        return Err(RingError::BitLengthTooSmall(b).into());
    }
    // v XOR u < n を保証するため、全メンバーのモジュラスは b ビット以上
    if let Some((index, pk)) = ring
        .iter()
        .enumerate()
        .find(|(_, pk)| pk.n.bits() < b as u64)
    {
        error!(
            "メンバー {} のモジュラスが {} ビットで、b = {} に足りません。",
            index,
            pk.n.bits(),
            b
        );
        return Err(RingError::DomainTooWide {
            index,
            modulus_bits: pk.n.bits(),
            bit_length: b,
        }
        .into());
    }

    // メッセージのハッシュ値 (置換 E の鍵 k)
    let k = message_key(m);
    debug!("ring_sign: k = {}", k);

    let r = ring.len();
    let mut s: Vec<BigUint> = vec![BigUint::zero(); r];

    // 初期値 u をランダムに生成し、v = E_k(u) から環を回し始める
    let u = sample(b - 1, rng)?;
    debug!("ring_sign: u = {}", u);
    let mut v = e_k(&k, &u);
    // 署名者が n-1 の場合は巡回中に c が更新されないため、この値が c となる
    let mut c = v.clone();

    for i in walk_order(signer, r) {
        s[i] = sample(b - 1, rng)?;
        let y = g(&ring[i], &s[i]);
        v = e_k(&k, &(&v ^ &y));
        debug!("ring_sign: s[{}] = {}, v = {}", i, s[i], v);
        // インデックス n-1 の直後の値をグルー値として固定する
        if i == r - 1 {
            c = v.clone();
        }
    }

    // 署名者のスロットで環を閉じる: g(s_signer) = v XOR u
    let y_signer = &v ^ &u;
    s[signer] = g_inverse(signer_secret, &y_signer);
    debug!("ring_sign: s[{}] = {}", signer, s[signer]);

    let ring_signature = RingSignature { c, s };
    info!(
        "リング署名生成完了: c bits = {}, s_len = {}",
        ring_signature.c.bits(),
        ring_signature.s.len()
    );
    Ok(ring_signature)
}

/// リング署名検証
/// ring: リングメンバーの公開鍵リスト
/// sig: 検証対象のリング署名
/// m: 検証対象のメッセージ
pub fn ring_verify(ring: &[PublicKey], sig: &RingSignature, m: &[u8]) -> Result<bool> {
    info!(
        "リング署名検証開始: ring_size = {}, c bits = {}, s_len = {}, m_len = {}",
        ring.len(),
        sig.c.bits(),
        sig.s.len(),
        m.len()
    );
    if ring.is_empty() {
        return Err(RingError::EmptyRing.into());
    }
    check_public_keys(ring)?;
    if sig.s.len() != ring.len() {
        error!(
            "署名の長さ {} がリングサイズ {} + 1 と一致しません。",
            sig.s.len() + 1,
            ring.len()
        );
        return Err(RingError::MalformedSignature {
            expected: ring.len() + 1,
            actual: sig.s.len() + 1,
        }
        .into());
    }

    let k = message_key(m);
    debug!("ring_verify: k = {}", k);

    // c から始めてインデックス順に環を一周する
    let t = ring
        .iter()
        .zip(&sig.s)
        .enumerate()
        .fold(sig.c.clone(), |t, (i, (pk, s_i))| {
            let y = g(pk, s_i);
            let next = e_k(&k, &(&t ^ &y));
            debug!("ring_verify: t[{}] = {}", i, next);
            next
        });

    // 一周した結果がグルー値 c と一致するかどうかで検証
    let verification = t == sig.c;
    info!("リング署名検証結果: {}", verification);
    Ok(verification)
}

/// [c, s_0, ..., s_{n-1}] の平坦な列で与えられた署名を検証する
pub fn ring_verify_values(ring: &[PublicKey], values: &[BigUint], m: &[u8]) -> Result<bool> {
    if values.len() != ring.len() + 1 {
        return Err(RingError::MalformedSignature {
            expected: ring.len() + 1,
            actual: values.len(),
        }
        .into());
    }
    match RingSignature::from_values(values) {
        Some(sig) => ring_verify(ring, &sig, m),
        None => Err(RingError::MalformedSignature {
            expected: ring.len() + 1,
            actual: 0,
        }
        .into()),
    }
}
