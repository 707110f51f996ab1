// ==========================================
// 仓储运营分析系统 - 物料组主数据导入器
// ==========================================
// 职责: Material Group 主数据文件 → 物料号索引的主数据表
// 同一物料号出现多次时保留首条
// ==========================================

use crate::domain::master::MaterialGroupMaster;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// 主数据文件的必需列
pub const REQUIRED_MASTER_COLUMNS: [&str; 5] = [
    "Material ID",
    "Product lvl 1-Category",
    "Product lvl 2-Type",
    "Product lvl 3-Group",
    "Material Group 2",
];

pub struct MasterImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl MasterImporter {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper::new(),
        }
    }

    /// 加载物料组主数据
    ///
    /// # 参数
    /// - `file_path`: 主数据文件路径（通常为配置中的 Material Group.xlsx）
    ///
    /// # 返回
    /// 物料号 → 主数据记录
    pub fn load<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> ImportResult<HashMap<String, MaterialGroupMaster>> {
        let path = file_path.as_ref();
        info!(file = %path.display(), "开始加载物料组主数据");

        let raw_rows = self.parser.parse(path)?;
        if raw_rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }
        self.mapper
            .ensure_columns(&raw_rows[0], &REQUIRED_MASTER_COLUMNS)?;

        let total = raw_rows.len();
        let mut masters: HashMap<String, MaterialGroupMaster> = HashMap::new();
        let mut dropped = 0usize;
        let mut duplicates = 0usize;

        for row in &raw_rows {
            match self.mapper.map_to_group_master(row) {
                Some(master) => {
                    if masters.contains_key(&master.material_id) {
                        duplicates += 1;
                    } else {
                        masters.insert(master.material_id.clone(), master);
                    }
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 || duplicates > 0 {
            warn!(
                dropped = dropped,
                duplicates = duplicates,
                "主数据存在物料号缺失或重复的行"
            );
        }
        info!(total = total, loaded = masters.len(), "物料组主数据加载完成");

        Ok(masters)
    }
}

impl Default for MasterImporter {
    fn default() -> Self {
        Self::new()
    }
}
