// ==========================================
// 仓储运营分析系统 - 单位换算导入器
// ==========================================
// 职责: ZRW12-UoM 导出文件 → 物料号索引的换算表
// 同一物料号出现多次时保留首条；系数不可解析时保留记录、系数置 None
// ==========================================

use crate::domain::master::UomConversion;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// ZRW12-UoM 导出的必需列
pub const REQUIRED_UOM_COLUMNS: [&str; 2] = ["Material", "UOM(in BUn)"];

pub struct UomImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl UomImporter {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
        }
    }

    /// 加载单位换算表
    ///
    /// # 参数
    /// - `file_path`: ZRW12-UoM 文件路径
    ///
    /// # 返回
    /// 物料号 → 每箱件数换算记录
    pub fn load<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> ImportResult<HashMap<String, UomConversion>> {
        let path = file_path.as_ref();
        info!(file = %path.display(), "开始加载单位换算表");

        let raw_rows = self.parser.parse(path)?;
        if raw_rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }
        self.mapper.ensure_columns(&raw_rows[0], &REQUIRED_UOM_COLUMNS)?;

        let total = raw_rows.len();
        let mut conversions: HashMap<String, UomConversion> = HashMap::new();
        let mut dropped = 0usize;
        let mut unusable = 0usize;

        for row in &raw_rows {
            match self.mapper.map_to_uom_conversion(row) {
                Some(conversion) => {
                    if !conversion.is_usable() {
                        unusable += 1;
                    }
                    // 保留首条
                    conversions
                        .entry(conversion.material_id.clone())
                        .or_insert(conversion);
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 || unusable > 0 {
            warn!(
                dropped = dropped,
                unusable = unusable,
                "换算表存在物料号缺失或系数不可用的行"
            );
        }
        info!(total = total, loaded = conversions.len(), "单位换算表加载完成");

        Ok(conversions)
    }
}

impl Default for UomImporter {
    fn default() -> Self {
        Self::new()
    }
}
