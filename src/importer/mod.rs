// ==========================================
// 课程排课系统 - 导入层
// ==========================================
// 职责: 从外部文件导入班级/课程/教师/教室/排课映射
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod catalog_importer;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use catalog_importer::{CatalogImportReport, CatalogImporter, CatalogKind, RowFailure};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
