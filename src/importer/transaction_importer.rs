// ==========================================
// 仓储运营分析系统 - 作业流水导入器
// ==========================================
// 职责: ZRW70 流水导出文件 → TransactionRow 列表
// 流程: 解析 → 必需列校验 → 字段映射 → 物料号过滤
// ==========================================

use crate::domain::transaction::{ImportSummary, RawTransactionRecord, TransactionRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::path::Path;
use tracing::{info, warn};

/// ZRW70 流水导出的必需列
pub const REQUIRED_TRANSACTION_COLUMNS: [&str; 4] = [
    "Material ID",
    "Reference Document",
    "Storage Type Suggestion",
    "TO Dummy",
];

pub struct TransactionImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl TransactionImporter {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
        }
    }

    /// 导入作业流水文件（CSV / XLSX，按扩展名分派）
    ///
    /// 物料号缺失的行无法参与任何分析，导入阶段直接丢弃并计数；
    /// 其余字段的脏数据按宽容式解析置 None，保留整行。
    ///
    /// # 参数
    /// - `file_path`: 流水文件路径
    ///
    /// # 返回
    /// - Ok: (流水行列表, 导入汇总)
    /// - Err: 文件级错误（不存在 / 格式不支持 / 缺少必需列 / 无数据行）
    pub fn import<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> ImportResult<(Vec<TransactionRow>, ImportSummary)> {
        let path = file_path.as_ref();
        info!(file = %path.display(), "开始导入作业流水");

        let raw_rows = self.parser.parse(path)?;
        if raw_rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }
        self.mapper
            .ensure_columns(&raw_rows[0], &REQUIRED_TRANSACTION_COLUMNS)?;

        let total_rows = raw_rows.len();
        let mut rows = Vec::with_capacity(total_rows);
        let mut dropped_missing_id = 0usize;

        for (idx, raw) in raw_rows.into_iter().enumerate() {
            let record = self.mapper.map_to_raw_transaction(raw, idx + 1);
            match Self::into_transaction_row(record) {
                Some(row) => rows.push(row),
                None => dropped_missing_id += 1,
            }
        }

        if dropped_missing_id > 0 {
            warn!(dropped = dropped_missing_id, "物料号缺失的流水行已丢弃");
        }

        let summary = ImportSummary {
            total_rows,
            imported: rows.len(),
            dropped_missing_id,
        };
        info!(
            total = summary.total_rows,
            imported = summary.imported,
            dropped = summary.dropped_missing_id,
            "作业流水导入完成"
        );

        Ok((rows, summary))
    }

    /// 原始记录 → 流水行（物料号缺失时返回 None）
    fn into_transaction_row(record: RawTransactionRecord) -> Option<TransactionRow> {
        let material_id = record.material_id?;
        Some(TransactionRow {
            material_id,
            material_desc: record.material_desc,
            reference_document: record.reference_document,
            storage_zone: record.storage_zone,
            quantity_marker: record.quantity_marker,
            quantity: record.quantity,
            uom_actual: record.uom_actual,
            movement_type: record.movement_type,
            confirm_time: record.confirm_time,
            created_time: record.created_time,
            created_date: record.created_date,
        })
    }
}

impl Default for TransactionImporter {
    fn default() -> Self {
        Self::new()
    }
}
