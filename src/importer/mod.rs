// ==========================================
// 仓储运营分析系统 - 导入层
// ==========================================
// 职责: 外部报表文件导入，生成内部数据
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod master_importer;
pub mod stock_analysis_importer;
pub mod transaction_importer;
pub mod uom_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use master_importer::{MasterImporter, REQUIRED_MASTER_COLUMNS};
pub use stock_analysis_importer::StockAnalysisImporter;
pub use transaction_importer::{TransactionImporter, REQUIRED_TRANSACTION_COLUMNS};
pub use uom_importer::{UomImporter, REQUIRED_UOM_COLUMNS};
