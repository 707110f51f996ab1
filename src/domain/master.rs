// ==========================================
// 仓储运营分析系统 - 主数据领域模型
// ==========================================
// 依据: Material Group 主数据文件 / ZRW12-UoM 单位换算导出
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 物料组主数据（物料号 → 产品层级与物料组）
// ==========================================
// 多个物料映射到同一个物料组（多对一）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialGroupMaster {
    pub material_id: String,            // 物料号
    pub category_lvl1: Option<String>,  // 产品层级 1 - 类别
    pub type_lvl2: Option<String>,      // 产品层级 2 - 类型
    pub group_lvl3: Option<String>,     // 产品层级 3 - 组
    pub material_group: Option<String>, // 物料组 (Material Group 2)
}

// ==========================================
// 单位换算（物料号 → 每箱件数）
// ==========================================
// 来源: ZRW12-UoM 的 "UOM(in BUn)" 列
// 换算系数缺失或非正数时，该物料的箱数换算结果为 None
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UomConversion {
    pub material_id: String,          // 物料号
    pub pieces_per_box: Option<f64>,  // 每箱件数换算系数
}

impl UomConversion {
    /// 换算系数是否可用（存在且为正数）
    pub fn is_usable(&self) -> bool {
        self.usable_factor().is_some()
    }

    /// 可用的换算系数（缺失或非正数时为 None）
    pub fn usable_factor(&self) -> Option<f64> {
        self.pieces_per_box.filter(|f| *f > 0.0)
    }
}
