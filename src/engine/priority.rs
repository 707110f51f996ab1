// ==========================================
// 仓储运营分析系统 - 拣货优先级引擎
// ==========================================
// 职责: 依据作业流水计算各物料组的拣货优先级
// 输入: 库区过滤后的分析行 + 物料组全集
// 输出: 填充完整并可排序的 GroupPriority 表
// ==========================================

use crate::domain::layout::GroupPriority;
use crate::domain::transaction::AnalysisRow;
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// PickPriorityScorer - 拣货优先级引擎
// ==========================================
pub struct PickPriorityScorer {
    // 无状态引擎,不需要注入依赖
}

impl PickPriorityScorer {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 PickPriorityScorer 实例
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算物料组优先级表
    ///
    /// 计算步骤:
    /// 1) 按参考凭证分组，组内按确认时间升序（缺失时间排最后）
    /// 2) 行得分 = 组内序号 / 凭证行数（0..1，越小越早被拣）
    /// 3) 物料组得分 = 该组全部行得分的均值（跨凭证）
    /// 4) 首拣频次 = 该组作为凭证首行出现的凭证数
    /// 5) 未出现在流水中的物料组: 频次填 0，得分填已观测均值的最大值
    ///
    /// # 参数
    /// - `rows`: 库区过滤后的分析行
    /// - `universe`: 物料组全集（决定输出条目与顺序）
    ///
    /// # 返回
    /// 与 universe 等长的优先级表
    pub fn score(&self, rows: &[AnalysisRow], universe: &[String]) -> Vec<GroupPriority> {
        // 按凭证分组，保持输入顺序
        let mut documents: HashMap<&str, Vec<&AnalysisRow>> = HashMap::new();
        for row in rows {
            documents
                .entry(row.reference_document.as_str())
                .or_default()
                .push(row);
        }

        let mut score_sums: HashMap<&str, (f64, usize)> = HashMap::new();
        let mut first_pick_counts: HashMap<&str, u32> = HashMap::new();

        for doc_rows in documents.values_mut() {
            doc_rows.sort_by(|a, b| Self::compare_confirm_time(a, b));

            // 凭证行数包含缺失物料组的行，序号也一并计入
            let total = doc_rows.len() as f64;
            for (index, row) in doc_rows.iter().enumerate() {
                let Some(group) = row.material_group.as_deref() else {
                    continue;
                };

                let row_score = (index + 1) as f64 / total;
                let entry = score_sums.entry(group).or_insert((0.0, 0));
                entry.0 += row_score;
                entry.1 += 1;

                if index == 0 {
                    *first_pick_counts.entry(group).or_insert(0) += 1;
                }
            }
        }

        let mean_scores: HashMap<&str, f64> = score_sums
            .into_iter()
            .map(|(group, (sum, count))| (group, sum / count as f64))
            .collect();

        // 未观测组的得分回填值: 已观测均值的最大值（无任何观测时回填 1.0）
        let max_observed = mean_scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let fill_score = if max_observed.is_finite() { max_observed } else { 1.0 };

        universe
            .iter()
            .map(|group| GroupPriority {
                material_group: group.clone(),
                first_pick_frequency: first_pick_counts.get(group.as_str()).copied().unwrap_or(0),
                picking_sequence_score: mean_scores
                    .get(group.as_str())
                    .copied()
                    .unwrap_or(fill_score),
            })
            .collect()
    }

    /// 按优先级排序物料组
    ///
    /// 排序键:
    /// 1) first_pick_frequency 降序（常作首拣的组优先）
    /// 2) picking_sequence_score 升序（越早被拣越优先）
    /// 3) material_group 升序（字典序，保证结果确定）
    ///
    /// # 参数
    /// - `table`: 优先级表
    ///
    /// # 返回
    /// 排序后的优先级表（按优先级从高到低）
    pub fn sort(&self, mut table: Vec<GroupPriority>) -> Vec<GroupPriority> {
        table.sort_by(|a, b| self.compare(a, b));
        table
    }

    // ==========================================
    // 比较方法
    // ==========================================

    /// 比较两个物料组的优先级
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    fn compare(&self, a: &GroupPriority, b: &GroupPriority) -> Ordering {
        // 1. 首拣频次降序
        match b.first_pick_frequency.cmp(&a.first_pick_frequency) {
            Ordering::Equal => {}
            other => return other,
        }

        // 2. 拣货顺序得分升序
        match a
            .picking_sequence_score
            .total_cmp(&b.picking_sequence_score)
        {
            Ordering::Equal => {}
            other => return other,
        }

        // 3. 物料组字典序
        a.material_group.cmp(&b.material_group)
    }

    /// 确认时间升序，缺失时间排最后；时间相同时保持输入顺序（稳定排序）
    fn compare_confirm_time(a: &AnalysisRow, b: &AnalysisRow) -> Ordering {
        match (a.confirm_time, b.confirm_time) {
            (Some(ta), Some(tb)) => ta.cmp(&tb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PickPriorityScorer {
    fn default() -> Self {
        Self::new()
    }
}
