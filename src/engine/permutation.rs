// ==========================================
// 地震情景后果模拟 - 确定性实现置换
// ==========================================
// 职责: 按种子生成 [0, n) 的置换, 用于重排后果实现
// 红线: 算法固定并版本化, 同一 (n, seed) 永远得到同一置换
// ==========================================
//
// 算法 chacha8-fisher-yates-v1:
// 1. rng = ChaCha8Rng::seed_from_u64(seed)
//    (rand_core 0.6: PCG32 展开 64 位种子为 32 字节密钥, stream = 0)
// 2. perm = [0, 1, ..., n-1]
// 3. i 从 n-1 递减到 1: j = rng.next_u64() % (i + 1); 交换 perm[i], perm[j]
//
// 回归向量: n = 5, seed = 1 → [2, 0, 4, 3, 1]

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 置换算法版本标识
pub const SHUFFLE_ALGORITHM: &str = "chacha8-fisher-yates-v1";

/// 按遍历位置计算种子 (第一个资产种子为 1, 依次递增)
pub fn seed_for_position(position: usize) -> u64 {
    position as u64 + 1
}

/// 生成 [0, n) 的确定性置换
pub fn seeded_permutation(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut perm: Vec<usize> = (0..n).collect();

    for i in (1..n).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        perm.swap(i, j);
    }

    perm
}

/// 按置换重排: output[i] = values[perm[i]]
pub fn reindex<T: Clone>(values: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&idx| values[idx].clone()).collect()
}
