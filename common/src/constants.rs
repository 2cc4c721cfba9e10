// RSA公開指数 (一般的に使用される65537)
pub const E: u32 = 65537;
// リング署名の共通ビット長 L のデフォルト値 (乱数 u, s_i は [0, 2^(L-1)) から選ぶ)
pub const DEFAULT_BIT_LENGTH: usize = 1024;
// 鍵生成時のモジュラスのデフォルトビット長
pub const DEFAULT_KEY_BITS: usize = 1024;
// Miller-Rabin 判定の試行回数 (誤判定確率は 4^-128 以下)
pub const MILLER_RABIN_ROUNDS: usize = 128;
// メッセージダイジェスト (SHA3-256) のビット長
pub const DIGEST_BITS: usize = 256;
