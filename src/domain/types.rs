// ==========================================
// 仓储运营分析系统 - 领域类型定义
// ==========================================
// 依据: ZRW70 作业流水导出字段 / 库区编码表
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库区编码 (Zone Code)
// ==========================================
// 布局分析可选库区为固定枚举，最多同时选择 2 个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneCode {
    Zaa,
    Zab,
    Zac,
    Zad,
    Zae,
    Zaf,
    Zag,
    Zah,
    Zai,
    Zaj,
    Zak,
    Zal,
    Zam,
}

impl ZoneCode {
    /// 全部可选库区（与 WMS 库区主数据一致）
    pub const ALL: [ZoneCode; 13] = [
        ZoneCode::Zaa,
        ZoneCode::Zab,
        ZoneCode::Zac,
        ZoneCode::Zad,
        ZoneCode::Zae,
        ZoneCode::Zaf,
        ZoneCode::Zag,
        ZoneCode::Zah,
        ZoneCode::Zai,
        ZoneCode::Zaj,
        ZoneCode::Zak,
        ZoneCode::Zal,
        ZoneCode::Zam,
    ];

    /// 从库区编码字符串解析（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ZAA" => Some(ZoneCode::Zaa),
            "ZAB" => Some(ZoneCode::Zab),
            "ZAC" => Some(ZoneCode::Zac),
            "ZAD" => Some(ZoneCode::Zad),
            "ZAE" => Some(ZoneCode::Zae),
            "ZAF" => Some(ZoneCode::Zaf),
            "ZAG" => Some(ZoneCode::Zag),
            "ZAH" => Some(ZoneCode::Zah),
            "ZAI" => Some(ZoneCode::Zai),
            "ZAJ" => Some(ZoneCode::Zaj),
            "ZAK" => Some(ZoneCode::Zak),
            "ZAL" => Some(ZoneCode::Zal),
            "ZAM" => Some(ZoneCode::Zam),
            _ => None,
        }
    }

    /// 库区编码字符串（与 ZRW70 的 Storage Type Suggestion 列取值一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneCode::Zaa => "ZAA",
            ZoneCode::Zab => "ZAB",
            ZoneCode::Zac => "ZAC",
            ZoneCode::Zad => "ZAD",
            ZoneCode::Zae => "ZAE",
            ZoneCode::Zaf => "ZAF",
            ZoneCode::Zag => "ZAG",
            ZoneCode::Zah => "ZAH",
            ZoneCode::Zai => "ZAI",
            ZoneCode::Zaj => "ZAJ",
            ZoneCode::Zak => "ZAK",
            ZoneCode::Zal => "ZAL",
            ZoneCode::Zam => "ZAM",
        }
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 补货时段 (Time Interval)
// ==========================================
// 7 个固定的两小时时段 (07:00 起至 21:00 止)，其余归入 Other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInterval {
    H07to09,
    H09to11,
    H11to13,
    H13to15,
    H15to17,
    H17to19,
    H19to21,
    Other,
}

impl TimeInterval {
    /// 全部时段（按时间先后排列，Other 最后）
    pub const ALL: [TimeInterval; 8] = [
        TimeInterval::H07to09,
        TimeInterval::H09to11,
        TimeInterval::H11to13,
        TimeInterval::H13to15,
        TimeInterval::H15to17,
        TimeInterval::H17to19,
        TimeInterval::H19to21,
        TimeInterval::Other,
    ];

    /// 按创建时刻的小时数归入时段
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            7 | 8 => TimeInterval::H07to09,
            9 | 10 => TimeInterval::H09to11,
            11 | 12 => TimeInterval::H11to13,
            13 | 14 => TimeInterval::H13to15,
            15 | 16 => TimeInterval::H15to17,
            17 | 18 => TimeInterval::H17to19,
            19 | 20 => TimeInterval::H19to21,
            _ => TimeInterval::Other,
        }
    }

    /// 报表展示用标签
    pub fn label(&self) -> &'static str {
        match self {
            TimeInterval::H07to09 => "07:00-09:00",
            TimeInterval::H09to11 => "09:00-11:00",
            TimeInterval::H11to13 => "11:00-13:00",
            TimeInterval::H13to15 => "13:00-15:00",
            TimeInterval::H15to17 => "15:00-17:00",
            TimeInterval::H17to19 => "17:00-19:00",
            TimeInterval::H19to21 => "19:00-21:00",
            TimeInterval::Other => "Other",
        }
    }

    /// 从展示标签解析（用于 CLI 筛选参数）
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        TimeInterval::ALL
            .iter()
            .copied()
            .find(|iv| iv.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 计量单位 (UoM Code)
// ==========================================
// ZRW70 的 UOM Actual 列取值；无法识别的单位不参与箱数换算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UomCode {
    Box, // 箱
    Pcs, // 件
}

impl UomCode {
    /// 从单位字符串解析；未知单位返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BOX" => Some(UomCode::Box),
            "PCS" => Some(UomCode::Pcs),
            _ => None,
        }
    }
}

impl fmt::Display for UomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UomCode::Box => write!(f, "BOX"),
            UomCode::Pcs => write!(f, "PCS"),
        }
    }
}

// ==========================================
// 库存计算均值列 (Avg Column)
// ==========================================
// 最小/最大库存计算可选的三个历史均值口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvgColumn {
    PickingMonth1, // 上月日均拣货箱数
    Last14Days,    // 近 14 天日均箱数
    Last3Days,     // 近 3 天日均箱数
}

impl AvgColumn {
    /// 从 CLI 参数解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "month1" | "month-1" | "picking-month-1" => Some(AvgColumn::PickingMonth1),
            "last14" | "last-14" | "last-14-days" => Some(AvgColumn::Last14Days),
            "last3" | "last-3" | "last-3-days" => Some(AvgColumn::Last3Days),
            _ => None,
        }
    }

    /// 报表展示用列名（与库存分析导出文件一致）
    pub fn label(&self) -> &'static str {
        match self {
            AvgColumn::PickingMonth1 => "Avg Picking (Month-1) in Box",
            AvgColumn::Last14Days => "Avg Last 14 Days in Box",
            AvgColumn::Last3Days => "Avg Last 3 Days in Box",
        }
    }
}

impl fmt::Display for AvgColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 操作类型筛选 (Movement Filter)
// ==========================================
// 补货报表的操作类型筛选项；缺失值在界面上以 "N/A" 呈现并可被选中
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementFilter {
    Value(String), // 具体操作类型
    Missing,       // 无操作类型 (展示为 N/A)
}

impl MovementFilter {
    /// 从筛选字符串解析（"N/A" 表示缺失值）
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("N/A") {
            MovementFilter::Missing
        } else {
            MovementFilter::Value(trimmed.to_string())
        }
    }

    /// 判断一行的操作类型是否命中该筛选项
    pub fn matches(&self, movement_type: Option<&str>) -> bool {
        match (self, movement_type) {
            (MovementFilter::Missing, None) => true,
            (MovementFilter::Value(v), Some(m)) => v == m,
            _ => false,
        }
    }
}

impl fmt::Display for MovementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementFilter::Value(v) => write!(f, "{}", v),
            MovementFilter::Missing => write!(f, "N/A"),
        }
    }
}
