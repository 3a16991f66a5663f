//! Ошибки разбора и проверки отчётов о деятельности.

use crate::types::{ColumnKey, MetricFamily, Money};

/// Ошибка разбора данных сервиса или нарушения инвариантов отчёта.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Ошибка ввода-вывода при чтении исходного файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Ошибка разбора JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// Некорректный ключ столбца (`1402` или `change.1403`).
    #[error("Invalid column key '{value}'")]
    ColumnKey {
        /// Исходное значение.
        value: String,
    },
    /// Некорректный составной ключ метрики (`totalSellPrice_change.1403`).
    #[error("Invalid metric key '{value}'")]
    MetricKey {
        /// Исходное значение.
        value: String,
    },
    /// Некорректный год.
    #[error("Invalid year '{value}'")]
    Year {
        /// Исходное значение.
        value: String,
    },
    /// Сервис вернул ошибку (сеть, 5xx).
    #[error("Upstream failure: {0}")]
    Upstream(String),
    /// Итоговое значение не равно сумме внутренних продаж и экспорта.
    #[error(
        "Total mismatch for '{code}' in {family}[{column}]: expected {expected}, got {actual}"
    )]
    TotalMismatch {
        /// Код инструмента.
        code: String,
        /// Итоговое семейство метрик.
        family: MetricFamily,
        /// Столбец (год).
        column: ColumnKey,
        /// Сумма внутренних продаж и экспорта.
        expected: Money,
        /// Значение из отчёта.
        actual: Money,
    },
}
