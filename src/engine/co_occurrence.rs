// ==========================================
// 仓储运营分析系统 - 共现矩阵引擎
// ==========================================
// 职责: 按拣货凭证统计物料组两两共现次数，派生聚类距离
// 同一凭证内重复出现的组只计一次；不统计自身共现
// ==========================================

use crate::domain::transaction::AnalysisRow;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

// ==========================================
// 共现矩阵（稠密索引 = 排序后的物料组全集）
// ==========================================
#[derive(Debug, Clone)]
pub struct CoOccurrenceMatrix {
    groups: Vec<String>,
    counts: Vec<Vec<u32>>,
}

impl CoOccurrenceMatrix {
    /// 物料组数
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 稠密索引对应的物料组（已排序）
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// 按稠密索引取共现次数
    pub fn count(&self, i: usize, j: usize) -> u32 {
        self.counts[i][j]
    }

    /// 按物料组标签取共现次数（任一标签不在全集时返回 None）
    pub fn count_of(&self, a: &str, b: &str) -> Option<u32> {
        let i = self.groups.iter().position(|g| g == a)?;
        let j = self.groups.iter().position(|g| g == b)?;
        Some(self.counts[i][j])
    }

    /// 派生距离矩阵: distance = 1 / (co + 1)，对角线为 0
    ///
    /// 共现越多距离越近；从未共现的组距离为 1。
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.groups.len();
        let mut distances = vec![vec![0.0f64; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    distances[i][j] = 1.0 / (f64::from(self.counts[i][j]) + 1.0);
                }
            }
        }
        distances
    }
}

// ==========================================
// CoOccurrenceBuilder - 共现矩阵构建引擎
// ==========================================
pub struct CoOccurrenceBuilder {
    // 无状态引擎，不需要注入依赖
}

impl CoOccurrenceBuilder {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 从分析行构建共现矩阵
    ///
    /// 步骤:
    /// 1. 物料组去重排序，建立稠密索引
    /// 2. 按参考凭证归并各凭证出现的物料组集合
    /// 3. 每个凭证内的无序组对 (i<j) 两侧各计一次
    ///
    /// # 参数
    /// - `rows`: 已过滤的分析行
    ///
    /// # 返回
    /// 对称共现矩阵（组全集为空时矩阵为 0×0）
    pub fn build(&self, rows: &[AnalysisRow]) -> CoOccurrenceMatrix {
        // 稠密索引
        let mut groups: Vec<String> = rows
            .iter()
            .filter_map(|row| row.material_group.clone())
            .collect();
        groups.sort();
        groups.dedup();

        let index: HashMap<&str, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.as_str(), i))
            .collect();

        // 凭证 → 物料组集合
        let mut document_groups: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for row in rows {
            if let Some(group) = row.material_group.as_deref() {
                document_groups
                    .entry(row.reference_document.as_str())
                    .or_default()
                    .insert(group);
            }
        }

        // 对称计数
        let n = groups.len();
        let mut counts = vec![vec![0u32; n]; n];
        for group_set in document_groups.values() {
            let members: Vec<usize> = group_set.iter().map(|g| index[g]).collect();
            for a in 0..members.len() {
                for b in (a + 1)..members.len() {
                    let (i, j) = (members[a], members[b]);
                    counts[i][j] += 1;
                    counts[j][i] += 1;
                }
            }
        }

        debug!(
            groups = n,
            documents = document_groups.len(),
            "共现矩阵构建完成"
        );

        CoOccurrenceMatrix { groups, counts }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for CoOccurrenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
