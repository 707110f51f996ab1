// ==========================================
// 仓储运营分析系统 - 库位布局领域模型
// ==========================================
// 布局分析的输出结构: 聚类结果 / 优先级 / 网格布局
// ==========================================

use crate::domain::types::ZoneCode;
use serde::{Deserialize, Serialize};

// ==========================================
// 物料组拣货优先级
// ==========================================
// first_pick_frequency 越高、picking_sequence_score 越低，越先分配近位库位
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPriority {
    pub material_group: String,       // 物料组
    pub first_pick_frequency: u32,    // 首拣频次（该组作为凭证第一拣的凭证数）
    pub picking_sequence_score: f64,  // 拣货顺序得分（0..1 之间的归一化均值，越小越早被拣）
}

// ==========================================
// 聚类结果汇总（按簇标签列出成员物料组）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub label: usize,            // 簇标签（仅在单次运行内有意义）
    pub groups: Vec<String>,     // 该簇的成员物料组（字典序）
}

// ==========================================
// 网格库位
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSlot {
    pub row: u32,      // 行号（0 起）
    pub column: u32,   // 列号（0 起）
    pub distance: u32, // 距入口的曼哈顿距离 (row + column)
}

impl GridSlot {
    pub fn new(row: u32, column: u32) -> Self {
        Self {
            row,
            column,
            distance: row + column,
        }
    }
}

// ==========================================
// 库位分配结果（一个物料组 → 一个网格库位）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutAssignment {
    pub material_group: String,                     // 物料组
    pub cluster_label: usize,                       // 所属簇标签
    pub row: u32,                                   // 分配的行号
    pub column: u32,                                // 分配的列号
    pub distance: u32,                              // 库位距离
    pub representative_material_id: Option<String>, // 该组在本库区出现最频繁的物料号
    pub representative_desc_word: Option<String>,   // 代表物料描述的首个单词（用于图上标注）
}

// ==========================================
// 单个库区的布局结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub zone: ZoneCode,                    // 库区编码
    pub grid_rows: u32,                    // 网格行数（用户参数）
    pub grid_columns: u32,                 // 网格列数（按组数向上取整计算）
    pub assignments: Vec<LayoutAssignment>, // 库位分配（按优先级顺序）
    pub unassigned_groups: Vec<String>,    // 未能分配库位的物料组（正常情况下为空）
}

impl ZoneLayout {
    /// 网格总库位数
    pub fn slot_count(&self) -> u32 {
        self.grid_rows * self.grid_columns
    }
}
