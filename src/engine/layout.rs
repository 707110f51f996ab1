// ==========================================
// 仓储运营分析系统 - 库位布局引擎
// ==========================================
// 职责: 按优先级将物料组贪心分配到网格库位
// 输入: 排序后的优先级表 + 库区过滤行 + 聚类标签
// 输出: 单个库区的 ZoneLayout
// ==========================================

use crate::domain::layout::{GridSlot, GroupPriority, LayoutAssignment, ZoneLayout};
use crate::domain::transaction::AnalysisRow;
use crate::domain::types::ZoneCode;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

// ==========================================
// LayoutAssigner - 库位布局引擎
// ==========================================
pub struct LayoutAssigner {
    // 无状态引擎,不需要注入依赖
}

impl LayoutAssigner {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 LayoutAssigner 实例
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 布局一个库区
    ///
    /// 分配步骤:
    /// 1) 从全局优先级表中筛出本库区出现过的物料组（保持既有排序）
    /// 2) 列数 = max(1, ceil(组数 / 行数))
    /// 3) 库位按距离 (row + column) 升序排列，同距离保持行优先顺序
    /// 4) 按优先级顺序依次取最近的空库位
    /// 5) 为每个分配组附加代表物料标注
    ///
    /// # 参数
    /// - `zone`: 库区编码
    /// - `grid_rows`: 网格行数（用户参数，须 ≥ 1）
    /// - `priority_table`: 全局优先级表（已按优先级排序）
    /// - `cluster_labels`: 物料组 → 簇标签
    /// - `zone_rows`: 本库区的分析行
    ///
    /// # 返回
    /// 本库区的布局结果
    pub fn assign(
        &self,
        zone: ZoneCode,
        grid_rows: u32,
        priority_table: &[GroupPriority],
        cluster_labels: &HashMap<String, usize>,
        zone_rows: &[&AnalysisRow],
    ) -> EngineResult<ZoneLayout> {
        if grid_rows == 0 {
            return Err(EngineError::InvalidGridRows(grid_rows));
        }

        // 本库区出现过的物料组；优先级表的有序子序列仍然有序
        let zone_groups: HashSet<&str> = zone_rows
            .iter()
            .filter_map(|r| r.material_group.as_deref())
            .collect();
        let zone_table: Vec<&GroupPriority> = priority_table
            .iter()
            .filter(|p| zone_groups.contains(p.material_group.as_str()))
            .collect();

        let grid_columns = self.grid_columns(zone_table.len(), grid_rows);
        debug!(
            zone = %zone,
            groups = zone_table.len(),
            grid_rows,
            grid_columns,
            "开始库区布局"
        );

        self.build_layout(zone, grid_rows, grid_columns, &zone_table, cluster_labels, zone_rows)
    }

    /// 网格列数 = max(1, ceil(组数 / 行数))
    ///
    /// # 参数
    /// - `group_count`: 本库区的物料组数
    /// - `grid_rows`: 网格行数
    ///
    /// # 返回
    /// 网格列数（至少为 1）
    pub fn grid_columns(&self, group_count: usize, grid_rows: u32) -> u32 {
        let rows = grid_rows.max(1) as usize;
        let columns = (group_count + rows - 1) / rows;
        columns.max(1) as u32
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 在给定网格上执行贪心分配
    fn build_layout(
        &self,
        zone: ZoneCode,
        grid_rows: u32,
        grid_columns: u32,
        zone_table: &[&GroupPriority],
        cluster_labels: &HashMap<String, usize>,
        zone_rows: &[&AnalysisRow],
    ) -> EngineResult<ZoneLayout> {
        let mut slot_iter = self.ordered_slots(grid_rows, grid_columns).into_iter();

        let mut assignments = Vec::with_capacity(zone_table.len());
        let mut unassigned_groups = Vec::new();

        for priority in zone_table {
            match slot_iter.next() {
                Some(slot) => {
                    let (rep_id, rep_word) =
                        self.representative(zone_rows, &priority.material_group);
                    assignments.push(LayoutAssignment {
                        material_group: priority.material_group.clone(),
                        cluster_label: cluster_labels
                            .get(&priority.material_group)
                            .copied()
                            .unwrap_or(0),
                        row: slot.row,
                        column: slot.column,
                        distance: slot.distance,
                        representative_material_id: rep_id,
                        representative_desc_word: rep_word,
                    });
                }
                None => unassigned_groups.push(priority.material_group.clone()),
            }
        }

        // 列数按组数取整计算时不会溢出，此分支仅防御显式给定的过小网格
        if !unassigned_groups.is_empty() {
            warn!(
                zone = %zone,
                count = unassigned_groups.len(),
                "网格库位不足，存在未分配的物料组"
            );
        }

        Ok(ZoneLayout {
            zone,
            grid_rows,
            grid_columns,
            assignments,
            unassigned_groups,
        })
    }

    /// 生成库位序列: 距离升序，同距离保持行优先的生成顺序（稳定排序）
    fn ordered_slots(&self, rows: u32, columns: u32) -> Vec<GridSlot> {
        let mut slots = Vec::with_capacity((rows * columns) as usize);
        for row in 0..rows {
            for column in 0..columns {
                slots.push(GridSlot::new(row, column));
            }
        }
        slots.sort_by_key(|s| s.distance);
        slots
    }

    /// 查找物料组在本库区的代表物料
    ///
    /// 取该组出现次数最多的物料号（同频取字典序最小，保证结果可复现），
    /// 标注词为该物料按输入顺序首条非空描述的第一个单词。
    fn representative(
        &self,
        zone_rows: &[&AnalysisRow],
        group: &str,
    ) -> (Option<String>, Option<String>) {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for row in zone_rows
            .iter()
            .filter(|r| r.material_group.as_deref() == Some(group))
        {
            *counts.entry(row.material_id.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, u32)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let Some(&(top_id, _)) = ranked.first() else {
            return (None, None);
        };

        let desc_word = zone_rows
            .iter()
            .filter(|r| r.material_id == top_id)
            .filter_map(|r| r.material_desc.as_deref())
            .find_map(|d| d.split_whitespace().next())
            .map(|w| w.to_string());

        (Some(top_id.to_string()), desc_word)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for LayoutAssigner {
    fn default() -> Self {
        Self::new()
    }
}
