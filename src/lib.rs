#![warn(missing_docs)]
//! Агрегация и форматирование отчётов о деятельности эмитентов:
//! помесячные ряды по годам, нарастающий итог, таблица отчёта с сортировкой
//! и форматирование сумм с точностью по порядку величины.

mod chart;
mod error;
mod format;
mod parser;
mod raw;
mod report;
mod series;
mod session;
mod types;
mod utils;

pub use crate::chart::{
    ChartInput, ChartProjector, ChartSurface, ProjectedPoint, ProjectedSeries, SeriesKind,
    toggle_legend,
};
pub use crate::error::ReportError;
pub use crate::format::{
    DEFAULT_UNIT, NumberLocale, PRICE_SCALE, ValueFormatter, ValueFormatterBuilder, format_count,
    format_percentage, format_price, format_tooltip,
};
pub use crate::parser::{parse_year, sorted_years};
pub use crate::raw::{RawHistory, RawReportRow, RawReportTable};
pub use crate::report::{ReportFilter, ReportTable, SortState, sort_rows};
pub use crate::series::{
    ChartPoint, ChartSeries, MONTHS_PER_YEAR, SeriesBuilder, YearGroup, group_by_year,
};
pub use crate::session::{HistoryState, HistoryView, ReportSession};
pub use crate::types::*;
