use crate::crypto_utils::random_bits;
use crate::error::RsaError;
use anyhow::Result;
use log::{debug, trace};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::RngCore;

fn sample<R: RngCore + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint> {
    random_bits(bits, rng).map_err(|err| RsaError::Entropy(err.to_string()).into())
}

/// [low, low + width) から一様に選ぶ (棄却サンプリング)
fn sample_range<R: RngCore + ?Sized>(low: &BigUint, width: &BigUint, rng: &mut R) -> Result<BigUint> {
    let bits = width.bits() as usize;
    loop {
        let x = sample(bits, rng)?;
        if x < *width {
            return Ok(x + low);
        }
    }
}

/// Miller-Rabin 確率的素数判定
/// n: 判定対象
/// rounds: 試行回数 (合成数を素数と誤判定する確率は 4^-rounds 以下)
/// 乱数源の失敗は RsaError::Entropy として返す
pub fn is_probably_prime<R: RngCore + ?Sized>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<bool> {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if *n <= one {
        return Ok(false);
    }
    if *n == two || *n == three {
        return Ok(true);
    }
    if n.is_even() || (n % &three).is_zero() {
        return Ok(false);
    }

    // n - 1 = 2^r * s (s は奇数) に分解
    let n_minus_1 = n - &one;
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let s = &n_minus_1 >> r;
    trace!("is_probably_prime: r = {}, s = {}", r, s);
    // 底の候補数 (n-2) - 2 + 1 = n - 3
    let width = n - &three;

    'witness: for _ in 0..rounds {
        // 底 a を [2, n-2] から一様に選ぶ
        let a = sample_range(&two, &width, rng)?;
        let mut x = a.modpow(&s, n);
        if x == one || x == n_minus_1 {
            continue;
        }
        for _ in 1..r {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
            // n-1 を経由せずに 1 になった: 非自明な平方根が見つかった
            if x == one {
                return Ok(false);
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// 指定ビット長の奇数の候補を生成する
/// 最上位ビットと最下位ビットを立て、ビット長と奇数性を保証する
pub fn generate_prime_candidate<R: RngCore + ?Sized>(bits: usize, rng: &mut R) -> Result<BigUint> {
    // 2 ビット未満では奇素数の候補を作れない
    if bits < 2 {
        return Err(RsaError::InvalidBitLength(bits).into());
    }
    let candidate = sample(bits, rng)?;
    Ok(candidate | (BigUint::one() << (bits - 1)) | BigUint::one())
}

/// 素数判定を通過するまで候補を生成し続ける
pub fn generate_prime<R: RngCore + ?Sized>(
    bits: usize,
    rounds: usize,
    rng: &mut R,
) -> Result<BigUint> {
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let candidate = generate_prime_candidate(bits, rng)?;
        if is_probably_prime(&candidate, rounds, rng)? {
            debug!(
                "generate_prime: {} bits, found after {} candidates",
                bits, attempts
            );
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MILLER_RABIN_ROUNDS;
    use num_prime::nt_funcs::is_prime;
    use crate::test_utils::{CountdownRng, FailingRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn check(n: u64, rng: &mut ChaCha8Rng) -> bool {
        is_probably_prime(&BigUint::from(n), MILLER_RABIN_ROUNDS, rng).unwrap()
    }

    // 小さな値の境界ケース
    #[test]
    fn test_small_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(!check(0, &mut rng));
        assert!(!check(1, &mut rng));
        assert!(check(2, &mut rng));
        assert!(check(3, &mut rng));
        assert!(!check(4, &mut rng));
        assert!(check(5, &mut rng));
        assert!(!check(9, &mut rng));
        assert!(check(7919, &mut rng));
    }

    // カーマイケル数はフェルマーテストを騙すが Miller-Rabin では合成数と判定される
    #[test]
    fn test_carmichael_numbers() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for n in [561u64, 1105, 1729, 2465, 2821, 6601, 8911, 41041, 825265] {
            assert!(!check(n, &mut rng), "{} はカーマイケル数", n);
        }
    }

    // num-prime の判定結果と突き合わせる
    #[test]
    fn test_matches_reference_below_5000() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for n in 0u64..5000 {
            assert_eq!(
                check(n, &mut rng),
                is_prime(&n, None).probably(),
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_large_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // メルセンヌ素数 2^127 - 1
        let m127 = (BigUint::one() << 127usize) - BigUint::one();
        assert!(is_probably_prime(&m127, MILLER_RABIN_ROUNDS, &mut rng).unwrap());
        // フェルマー数 F7 = 2^128 + 1 は合成数
        let f7 = (BigUint::one() << 128usize) + BigUint::one();
        assert!(!is_probably_prime(&f7, MILLER_RABIN_ROUNDS, &mut rng).unwrap());
        // 素数の積は合成数
        assert!(!is_probably_prime(&(&m127 * &m127), MILLER_RABIN_ROUNDS, &mut rng).unwrap());
    }

    #[test]
    fn test_generate_prime_candidate() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let c = generate_prime_candidate(64, &mut rng).unwrap();
            assert_eq!(c.bits(), 64);
            assert!(c.is_odd());
        }
    }

    // 生成された素数がビット長を満たし、num-prime でも素数と判定される
    #[test]
    fn test_generate_prime() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let bits = 128;
        let prime = generate_prime(bits, MILLER_RABIN_ROUNDS, &mut rng).unwrap();
        assert_eq!(prime.bits(), bits as u64);
        assert!(is_prime(&prime, None).probably());
    }

    // 2 ビット未満の候補は作れない (0 ビットでのアンダーフローや 1 ビットでの無限ループを防ぐ)
    #[test]
    fn test_rejects_tiny_bit_lengths() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for bits in [0usize, 1] {
            let err = generate_prime_candidate(bits, &mut rng).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RsaError>(),
                Some(RsaError::InvalidBitLength(b)) if *b == bits
            ));
            assert!(generate_prime(bits, MILLER_RABIN_ROUNDS, &mut rng).is_err());
        }
        // 2 ビットなら最小の奇素数 3 が得られる
        let prime = generate_prime(2, MILLER_RABIN_ROUNDS, &mut rng).unwrap();
        assert_eq!(prime, BigUint::from(3u32));
    }

    // 底の選択で乱数源が失敗してもパニックせずエラーを返す
    #[test]
    fn test_entropy_failure_while_testing() {
        let m127 = (BigUint::one() << 127usize) - BigUint::one();
        let err = is_probably_prime(&m127, MILLER_RABIN_ROUNDS, &mut FailingRng).unwrap_err();
        assert!(matches!(err.downcast_ref::<RsaError>(), Some(RsaError::Entropy(_))));

        // 候補の生成後、判定の途中で乱数が尽きる場合
        let mut rng = CountdownRng::new(8, 1);
        let err = generate_prime(128, MILLER_RABIN_ROUNDS, &mut rng).unwrap_err();
        assert!(matches!(err.downcast_ref::<RsaError>(), Some(RsaError::Entropy(_))));
    }

    // 底は [2, n-2] の範囲に収まる
    #[test]
    fn test_sample_range_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let two = BigUint::from(2u32);
        let width = BigUint::from(2u32);
        for _ in 0..100 {
            let a = sample_range(&two, &width, &mut rng).unwrap();
            assert!(a == BigUint::from(2u32) || a == BigUint::from(3u32));
        }
    }
}
