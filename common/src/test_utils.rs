use crate::rsa::{generate_keypair, KeyPair};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::OnceLock;

// テストで使用するRSA鍵のビット長と共通ビット長 L
pub(crate) const TEST_KEY_BITS: usize = 512;
pub(crate) const TEST_BIT_LENGTH: usize = 512;

const MAX_RING_SIZE: usize = 5;

// 鍵生成は遅いので、全テストで共有する鍵ペアを一度だけ生成する
pub(crate) fn keypairs(size: usize) -> &'static [KeyPair] {
    static KEYPAIRS: OnceLock<Vec<KeyPair>> = OnceLock::new();
    let all = KEYPAIRS.get_or_init(|| {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        (0..MAX_RING_SIZE)
            .map(|_| generate_keypair(TEST_KEY_BITS, &mut rng).expect("keypair generation"))
            .collect()
    });
    &all[..size]
}

// 常に失敗する乱数源
pub(crate) struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("entropy exhausted")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("entropy exhausted")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("entropy exhausted")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::other("entropy exhausted")))
    }
}

// 指定回数の try_fill_bytes までは成功し、その後は失敗する乱数源
pub(crate) struct CountdownRng {
    inner: ChaCha8Rng,
    remaining: usize,
}

impl CountdownRng {
    pub(crate) fn new(seed: u64, remaining: usize) -> Self {
        CountdownRng {
            inner: ChaCha8Rng::seed_from_u64(seed),
            remaining,
        }
    }
}

impl RngCore for CountdownRng {
    fn next_u32(&mut self) -> u32 {
        panic!("entropy exhausted")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("entropy exhausted")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("entropy exhausted")
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        if self.remaining == 0 {
            return Err(rand::Error::new(std::io::Error::other("entropy exhausted")));
        }
        self.remaining -= 1;
        self.inner.try_fill_bytes(dest)
    }
}
