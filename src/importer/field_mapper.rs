// ==========================================
// 仓储运营分析系统 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 标准字段映射 + 宽容式类型清洗
// WMS 不同版本的导出列名略有差异，通过别名列表兼容
// ==========================================

use crate::domain::master::{MaterialGroupMaster, UomConversion};
use crate::domain::transaction::RawTransactionRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 映射作业流水行（ZRW70 导出）
    ///
    /// 所有字段均为宽容式解析：单个单元格脏数据不中断整体导入，
    /// 解析失败的字段置 None，由下游数据准备阶段统一处理。
    ///
    /// # 参数
    /// - `row`: 列名 → 单元格文本
    /// - `row_number`: 源文件行号（从 1 计数）
    ///
    /// # 返回
    /// 映射后的原始流水记录
    pub fn map_to_raw_transaction(
        &self,
        row: HashMap<String, String>,
        row_number: usize,
    ) -> RawTransactionRecord {
        RawTransactionRecord {
            // 主键
            material_id: self
                .get_string(&row, "Material ID")
                .and_then(|v| self.cleaner.clean_material_id(&v)),

            // 基础信息
            material_desc: self.get_string(&row, "Material Desc"),
            reference_document: self.get_string(&row, "Reference Document"),
            storage_zone: self
                .get_string(&row, "Storage Type Suggestion")
                .map(|v| self.cleaner.clean_text(&v, true)),

            // 数量信息
            quantity_marker: self.get_string(&row, "TO Dummy"),
            quantity: self
                .get_string(&row, "TO Dummy Quantity")
                .and_then(|v| self.cleaner.parse_f64_lenient(&v)),
            uom_actual: self
                .get_string(&row, "UOM Actual")
                .map(|v| self.cleaner.clean_text(&v, true)),
            movement_type: self.get_string(&row, "Movement Type"),

            // 时间信息
            confirm_time: self
                .get_string(&row, "Confirm 1 Time")
                .and_then(|v| self.cleaner.parse_confirm_datetime(&v)),
            created_time: self
                .get_string(&row, "Created Time")
                .and_then(|v| self.cleaner.parse_time_hms(&v)),
            created_date: self
                .get_string(&row, "Created Date")
                .and_then(|v| self.cleaner.parse_created_date(&v)),

            // 元信息
            row_number,
        }
    }

    /// 映射物料组主数据行（Material Group 主数据文件）
    ///
    /// # 返回
    /// 物料号缺失时返回 None（该行不可用）
    pub fn map_to_group_master(&self, row: &HashMap<String, String>) -> Option<MaterialGroupMaster> {
        let material_id = self
            .get_string(row, "Material ID")
            .and_then(|v| self.cleaner.clean_material_id(&v))?;

        Some(MaterialGroupMaster {
            material_id,
            category_lvl1: self.get_string(row, "Product lvl 1-Category"),
            type_lvl2: self.get_string(row, "Product lvl 2-Type"),
            group_lvl3: self.get_string(row, "Product lvl 3-Group"),
            material_group: self.get_string(row, "Material Group 2"),
        })
    }

    /// 映射单位换算行（ZRW12-UoM 导出）
    ///
    /// 换算系数解析失败时保留记录但置 None，
    /// 箱数换算阶段按"系数不可用"处理。
    ///
    /// # 返回
    /// 物料号缺失时返回 None（该行不可用）
    pub fn map_to_uom_conversion(&self, row: &HashMap<String, String>) -> Option<UomConversion> {
        let material_id = self
            .get_string(row, "Material")
            .and_then(|v| self.cleaner.clean_material_id(&v))?;

        Some(UomConversion {
            material_id,
            pieces_per_box: self
                .get_string(row, "UOM(in BUn)")
                .and_then(|v| self.cleaner.parse_f64_lenient(&v)),
        })
    }

    /// 校验必需列是否齐全
    ///
    /// # 参数
    /// - `row`: 任意一条已解析的数据行（列名集合与表头一致）
    /// - `required`: 必需列的标准列名
    ///
    /// # 返回
    /// 缺少任一必需列（含其全部别名）时返回 MissingColumn 错误
    pub fn ensure_columns(
        &self,
        row: &HashMap<String, String>,
        required: &[&str],
    ) -> ImportResult<()> {
        for key in required {
            let present = self
                .aliases_for(key)
                .iter()
                .any(|alias| row.contains_key(*alias));
            if !present {
                return Err(ImportError::MissingColumn {
                    column: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        for alias in self.aliases_for(key) {
            if let Some(v) = row.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 标准列名 → 别名列表
    fn aliases_for<'a>(&self, key: &'a str) -> Vec<&'a str> {
        match key {
            "Material ID" => vec!["Material ID", "Material"],
            "Material" => vec!["Material", "Material ID"],
            "Material Desc" => vec!["Material Desc", "Material Description"],
            "Storage Type Suggestion" => vec!["Storage Type Suggestion", "Storage Type"],
            "Confirm 1 Time" => vec!["Confirm 1 Time", "Confirm Time"],
            "UOM(in BUn)" => vec!["UOM(in BUn)", "UOM (in BUn)"],
            "Material Group 2" => vec!["Material Group 2", "Material Group"],
            _ => vec![key],
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}
