// ==========================================
// 仓储运营分析系统 - 数据准备引擎
// ==========================================
// 职责: 流水 × 主数据左连接 + 数量标记过滤 + 库区筛选
// 布局分析的输入在这里统一成 AnalysisRow
// ==========================================

use crate::domain::master::MaterialGroupMaster;
use crate::domain::transaction::{AnalysisRow, TransactionRow};
use std::collections::HashMap;
use tracing::{debug, info};

// ==========================================
// DatasetPreparer - 数据准备引擎
// ==========================================
pub struct DatasetPreparer {
    // 无状态引擎，不需要注入依赖
}

impl DatasetPreparer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 流水与物料组主数据左连接，生成分析行
    ///
    /// 过滤规则（计数后丢弃，不报错）:
    /// - 数量标记列 (TO Dummy) 缺失的行
    /// - 参考凭证号缺失的行（无法参与按凭证的聚合）
    /// 主数据中不存在的物料保留，其层级与物料组字段为 None。
    ///
    /// # 参数
    /// - `rows`: 导入的流水行
    /// - `masters`: 物料号 → 主数据
    ///
    /// # 返回
    /// 分析行列表（保持输入顺序）
    pub fn prepare(
        &self,
        rows: &[TransactionRow],
        masters: &HashMap<String, MaterialGroupMaster>,
    ) -> Vec<AnalysisRow> {
        let total = rows.len();
        let mut dropped_marker = 0usize;
        let mut dropped_document = 0usize;
        let mut unmatched_master = 0usize;

        let mut prepared = Vec::with_capacity(total);
        for row in rows {
            if row.quantity_marker.is_none() {
                dropped_marker += 1;
                continue;
            }
            let reference_document = match &row.reference_document {
                Some(doc) => doc.clone(),
                None => {
                    dropped_document += 1;
                    continue;
                }
            };

            let master = masters.get(&row.material_id);
            if master.is_none() {
                unmatched_master += 1;
            }

            prepared.push(AnalysisRow {
                material_id: row.material_id.clone(),
                material_desc: row.material_desc.clone(),
                reference_document,
                storage_zone: row.storage_zone.clone(),
                quantity: row.quantity,
                confirm_time: row.confirm_time,
                category_lvl1: master.and_then(|m| m.category_lvl1.clone()),
                type_lvl2: master.and_then(|m| m.type_lvl2.clone()),
                group_lvl3: master.and_then(|m| m.group_lvl3.clone()),
                material_group: master.and_then(|m| m.material_group.clone()),
            });
        }

        info!(
            total = total,
            prepared = prepared.len(),
            dropped_marker = dropped_marker,
            dropped_document = dropped_document,
            unmatched_master = unmatched_master,
            "数据准备完成"
        );

        prepared
    }

    /// 筛选属于指定库区集合的分析行
    ///
    /// # 参数
    /// - `rows`: 分析行
    /// - `zones`: 库区代码集合（已大写）
    ///
    /// # 返回
    /// 命中库区的行（保持输入顺序）
    pub fn filter_zones(&self, rows: &[AnalysisRow], zones: &[String]) -> Vec<AnalysisRow> {
        let filtered: Vec<AnalysisRow> = rows
            .iter()
            .filter(|row| {
                row.storage_zone
                    .as_deref()
                    .map(|z| zones.iter().any(|zone| zone == z))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        debug!(total = rows.len(), filtered = filtered.len(), "库区筛选完成");
        filtered
    }

    /// 按库区拆分（用于逐库区布局）
    ///
    /// # 返回
    /// 每个库区一个行列表，保持 `zones` 给定的顺序
    pub fn split_by_zone<'a>(
        &self,
        rows: &'a [AnalysisRow],
        zones: &[String],
    ) -> Vec<(String, Vec<&'a AnalysisRow>)> {
        zones
            .iter()
            .map(|zone| {
                let zone_rows: Vec<&AnalysisRow> = rows
                    .iter()
                    .filter(|row| row.storage_zone.as_deref() == Some(zone.as_str()))
                    .collect();
                (zone.clone(), zone_rows)
            })
            .collect()
    }

    /// 提取排序后的物料组全集（去重、去 None）
    pub fn distinct_groups(&self, rows: &[AnalysisRow]) -> Vec<String> {
        let mut groups: Vec<String> = rows
            .iter()
            .filter_map(|row| row.material_group.clone())
            .collect();
        groups.sort();
        groups.dedup();
        groups
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DatasetPreparer {
    fn default() -> Self {
        Self::new()
    }
}
