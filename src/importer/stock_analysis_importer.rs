// ==========================================
// 仓储运营分析系统 - 库存分析导入器
// ==========================================
// 职责: Retail Warehouse Stock Analysis 导出 → StockAnalysisRecord 列表
// 文件前 3 行为横幅行，无表头，列按固定位置解析
// ==========================================

use crate::domain::replenishment::StockAnalysisRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use std::path::Path;
use tracing::{debug, info, warn};

/// 文件开头的横幅行数
const BANNER_ROWS: usize = 3;

/// 固定列位置（横幅行之后）
/// 0 品名 / 1 物料号 / 2 零售移动类别 / 3 建议评估 /
/// 4 上月日均箱数 / 5 近14天日均箱数 / 6 近3天日均箱数 / 7 库存箱数 / 8 可售天数
const COL_PRODUCT_NAME: usize = 0;
const COL_MATERIAL_ID: usize = 1;
const COL_MOVEMENT_CATEGORY: usize = 2;
const COL_ASSESSMENT: usize = 3;
const COL_AVG_MONTH1: usize = 4;
const COL_AVG_LAST14: usize = 5;
const COL_AVG_LAST3: usize = 6;
const COL_STOCK: usize = 7;
const COL_XDAYS: usize = 8;

pub struct StockAnalysisImporter {
    parser: UniversalFileParser,
    cleaner: DataCleaner,
}

impl StockAnalysisImporter {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            cleaner: DataCleaner,
        }
    }

    /// 加载库存分析导出文件
    ///
    /// # 参数
    /// - `file_path`: 库存分析文件路径
    ///
    /// # 返回
    /// 库存分析记录列表（物料号缺失的行已丢弃）
    pub fn load<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> ImportResult<Vec<StockAnalysisRecord>> {
        let path = file_path.as_ref();
        info!(file = %path.display(), "开始加载库存分析数据");

        let mut rows = self.parser.parse_positional(path, BANNER_ROWS)?;

        // 部分导出在横幅行之后还带一行表头文字，按首格内容识别并跳过
        if rows
            .first()
            .and_then(|r| r.get(COL_PRODUCT_NAME))
            .map(|c| c.trim().eq_ignore_ascii_case("Product Name"))
            .unwrap_or(false)
        {
            debug!("检测到残留表头行，已跳过");
            rows.remove(0);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }

        let total = rows.len();
        let mut records = Vec::with_capacity(total);
        let mut dropped = 0usize;

        for row in &rows {
            match self.map_row(row) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(dropped = dropped, "物料号缺失的库存分析行已丢弃");
        }
        info!(total = total, loaded = records.len(), "库存分析数据加载完成");

        Ok(records)
    }

    /// 按列位置映射单行（物料号缺失时返回 None）
    fn map_row(&self, row: &[String]) -> Option<StockAnalysisRecord> {
        let material_id = self
            .text_at(row, COL_MATERIAL_ID)
            .and_then(|v| self.cleaner.clean_material_id(&v))?;

        Some(StockAnalysisRecord {
            product_name: self.text_at(row, COL_PRODUCT_NAME),
            material_id,
            movement_category: self.text_at(row, COL_MOVEMENT_CATEGORY),
            assessment: self.text_at(row, COL_ASSESSMENT),
            avg_month1_box: self.number_at(row, COL_AVG_MONTH1),
            avg_last14_box: self.number_at(row, COL_AVG_LAST14),
            avg_last3_box: self.number_at(row, COL_AVG_LAST3),
            stock_box: self.number_at(row, COL_STOCK),
            xdays: self.text_at(row, COL_XDAYS),
        })
    }

    /// 取指定列的文本（越界或空白 → None）
    fn text_at(&self, row: &[String], index: usize) -> Option<String> {
        row.get(index).and_then(|cell| {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 取指定列的数值（不可解析 → None）
    fn number_at(&self, row: &[String], index: usize) -> Option<f64> {
        row.get(index)
            .and_then(|cell| self.cleaner.parse_f64_lenient(cell))
    }
}

impl Default for StockAnalysisImporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_csv(lines: &[&str]) -> NamedTempFile {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_load_skips_banner_rows() {
        let file = temp_csv(&[
            "Retail Warehouse Stock Analysis,,,,,,,,",
            "Generated: 2025-11-02,,,,,,,,",
            "Unit: Box,,,,,,,,",
            "INDOMIE GORENG 85G,1010513,FAST,OK,12.5,11.0,9.5,30,2.4",
            "AQUA 600ML,1020881,MEDIUM,REVIEW,4.0,3.5,niltext,12,3.0",
        ]);

        let importer = StockAnalysisImporter::new();
        let records = importer.load(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].material_id, "1010513");
        assert_eq!(records[0].avg_month1_box, Some(12.5));
        assert_eq!(records[0].xdays, Some("2.4".to_string()));
        // 不可解析的数值列置 None
        assert_eq!(records[1].avg_last3_box, None);
        assert_eq!(records[1].stock_box, Some(12.0));
    }

    #[test]
    fn test_load_skips_residual_header_row() {
        let file = temp_csv(&[
            "Banner 1,,,,,,,,",
            "Banner 2,,,,,,,,",
            "Banner 3,,,,,,,,",
            "Product Name,Material ID,Movement Category Retail,Min-Max Recommendation Assessment,Avg Picking (Month-1) in Box,Avg Last 14 Days in Box,Avg Last 3 Days in Box,Stock in Box,Xdays",
            "INDOMIE GORENG 85G,1010513.0,FAST,OK,12.5,11.0,9.5,30,2.4",
        ]);

        let importer = StockAnalysisImporter::new();
        let records = importer.load(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].material_id, "1010513");
    }

    #[test]
    fn test_load_drops_rows_without_material_id() {
        let file = temp_csv(&[
            "Banner 1,,,,,,,,",
            "Banner 2,,,,,,,,",
            "Banner 3,,,,,,,,",
            "INDOMIE GORENG 85G,1010513,FAST,OK,12.5,11.0,9.5,30,2.4",
            "GHOST PRODUCT,,SLOW,REVIEW,1.0,1.0,1.0,5,30",
        ]);

        let importer = StockAnalysisImporter::new();
        let records = importer.load(file.path()).unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_empty_after_banner() {
        let file = temp_csv(&["Banner 1", "Banner 2", "Banner 3"]);

        let importer = StockAnalysisImporter::new();
        let result = importer.load(file.path());

        assert!(matches!(result, Err(ImportError::EmptyFile(_))));
    }

    #[test]
    fn test_load_short_row_padded_with_none() {
        let file = temp_csv(&[
            "Banner 1,,,,,,,,",
            "Banner 2,,,,,,,,",
            "Banner 3,,,,,,,,",
            "INDOMIE GORENG 85G,1010513,FAST",
        ]);

        let importer = StockAnalysisImporter::new();
        let records = importer.load(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].assessment, None);
        assert_eq!(records[0].avg_month1_box, None);
        assert_eq!(records[0].xdays, None);
    }
}
