// ==========================================
// 仓储运营分析系统 - 层次聚类引擎
// ==========================================
// 职责: 在预计算距离矩阵上做平均连接凝聚聚类
// 聚类数 k = min(3, 组数)；标签仅在单次运行内有意义
// ==========================================

use crate::domain::layout::ClusterSummary;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

/// 默认目标聚类数上限
pub const DEFAULT_MAX_CLUSTERS: usize = 3;

// ==========================================
// AgglomerativeClusterer - 凝聚聚类引擎
// ==========================================
pub struct AgglomerativeClusterer {
    // 无状态引擎，不需要注入依赖
}

impl AgglomerativeClusterer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 以默认聚类数聚类: k = min(3, N)
    ///
    /// # 参数
    /// - `distances`: N×N 对称距离矩阵
    ///
    /// # 返回
    /// 每个稠密索引的聚类标签（0..k-1）
    pub fn cluster_auto(&self, distances: &[Vec<f64>]) -> EngineResult<Vec<usize>> {
        let n = distances.len();
        self.cluster(distances, DEFAULT_MAX_CLUSTERS.min(n.max(1)))
    }

    /// 平均连接凝聚聚类
    ///
    /// 过程: 每组自成一簇；每步合并"平均簇间距离"最小的两簇
    /// （并列时取当前簇序中最靠前的一对），直到剩余 k 簇。
    /// 标签按簇内最小成员索引升序编号 0..k-1，保证单次运行内可复现。
    ///
    /// # 参数
    /// - `distances`: N×N 对称距离矩阵
    /// - `k`: 目标聚类数（1 ≤ k ≤ N）
    ///
    /// # 返回
    /// 每个稠密索引的聚类标签
    pub fn cluster(&self, distances: &[Vec<f64>], k: usize) -> EngineResult<Vec<usize>> {
        let n = distances.len();
        if n == 0 {
            return Err(EngineError::EmptyGroupSet);
        }
        for row in distances {
            if row.len() != n {
                return Err(EngineError::DimensionMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
        }
        if k == 0 || k > n {
            return Err(EngineError::InvalidClusterCount(k));
        }

        // 初始: 每个索引自成一簇
        let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

        while clusters.len() > k {
            let mut best: Option<(usize, usize, f64)> = None;
            for a in 0..clusters.len() {
                for b in (a + 1)..clusters.len() {
                    let d = Self::average_distance(&clusters[a], &clusters[b], distances);
                    let closer = match best {
                        None => true,
                        Some((_, _, best_d)) => d < best_d,
                    };
                    if closer {
                        best = Some((a, b, d));
                    }
                }
            }

            // clusters.len() > k ≥ 1 时必有候选对
            let Some((a, b, _)) = best else { break };
            let merged = clusters.remove(b);
            clusters[a].extend(merged);
        }

        // 按簇内最小成员索引编号
        let mut order: Vec<usize> = (0..clusters.len()).collect();
        order.sort_by_key(|&c| clusters[c].iter().min().copied().unwrap_or(usize::MAX));

        let mut labels = vec![0usize; n];
        for (label, &c) in order.iter().enumerate() {
            for &member in &clusters[c] {
                labels[member] = label;
            }
        }

        debug!(groups = n, clusters = k, "层次聚类完成");
        Ok(labels)
    }

    /// 按标签归并聚类摘要（成员保持稠密索引顺序 = 字典序）
    ///
    /// # 参数
    /// - `groups`: 稠密索引对应的物料组（已排序）
    /// - `labels`: cluster 返回的标签
    pub fn summarize(&self, groups: &[String], labels: &[usize]) -> Vec<ClusterSummary> {
        let cluster_count = labels.iter().max().map(|m| m + 1).unwrap_or(0);
        let mut summaries: Vec<ClusterSummary> = (0..cluster_count)
            .map(|label| ClusterSummary {
                label,
                groups: Vec::new(),
            })
            .collect();

        for (group, &label) in groups.iter().zip(labels.iter()) {
            if let Some(summary) = summaries.get_mut(label) {
                summary.groups.push(group.clone());
            }
        }
        summaries
    }

    /// 两簇间平均距离（全部跨簇成员对的算术平均）
    fn average_distance(a: &[usize], b: &[usize], distances: &[Vec<f64>]) -> f64 {
        let mut sum = 0.0f64;
        for &i in a {
            for &j in b {
                sum += distances[i][j];
            }
        }
        sum / (a.len() * b.len()) as f64
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for AgglomerativeClusterer {
    fn default() -> Self {
        Self::new()
    }
}
