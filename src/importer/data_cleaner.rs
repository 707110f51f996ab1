// ==========================================
// 仓储运营分析系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 物料号规整 / 宽容式数值与日期解析
// 解析失败一律返回 None（与源报表的脏数据共存，不中断整体导入）
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

// Excel 序列日期纪元（序列值 1 对应 1899-12-31，含 1900 闰年兼容偏移）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段（TRIM，可选转大写）
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 规整物料号
    ///
    /// 数值型单元格经电子表格导出后会带 ".0" 浮点尾巴（如 "1010513.0"），
    /// 这里统一去除，保证与主数据的物料号能够对齐。
    pub fn clean_material_id(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        let cleaned = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }

    /// 宽容式浮点解析（失败 → None）
    pub fn parse_f64_lenient(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 解析创建时刻（HH:MM:SS，失败 → None）
    pub fn parse_time_hms(&self, value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M:%S").ok()
    }

    /// Excel 序列日期 → 日期
    ///
    /// WMS 导出的 Created Date 列为序列数值（自 1899-12-30 起的天数）。
    pub fn excel_serial_to_date(&self, serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(EXCEL_EPOCH.0, EXCEL_EPOCH.1, EXCEL_EPOCH.2)?;
        epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
    }

    /// 解析创建日期（序列数值优先，其次 ISO 日期；失败 → None）
    pub fn parse_created_date(&self, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(serial) = trimmed.parse::<f64>() {
            return self.excel_serial_to_date(serial);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
    }

    /// 解析确认时间（多格式尝试 + 序列数值兜底；失败 → None）
    pub fn parse_confirm_datetime(&self, value: &str) -> Option<NaiveDateTime> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        const FORMATS: [&str; 3] = [
            "%Y-%m-%d %H:%M:%S",
            "%Y/%m/%d %H:%M:%S",
            "%d.%m.%Y %H:%M:%S",
        ];
        for fmt in FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Some(dt);
            }
        }

        // Excel 序列日期时间（整数部分为天、小数部分为当天时刻）
        if let Ok(serial) = trimmed.parse::<f64>() {
            let date = self.excel_serial_to_date(serial)?;
            let day_fraction = serial.fract();
            let secs = (day_fraction * 86_400.0).round() as u32;
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs.min(86_399), 0)?;
            return Some(date.and_time(time));
        }

        None
    }
}
