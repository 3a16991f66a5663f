//! Таблица отчёта о деятельности, сортировка и параметры запроса к сервису.

use crate::error::ReportError;
use crate::parser::{parse_year, sorted_years};
use crate::types::{ColumnKey, MetricFamily, MetricKey, ReportRow, SortDirection, SortSpec};
use rust_decimal::Decimal;
use serde::Serialize;

/// Таблица отчёта в том виде, в котором её вернул сервис.
///
/// `years`, `month` и `period` описывают запрос и не пересчитываются.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportTable {
    /// Строки по инструментам.
    pub rows: Vec<ReportRow>,
    /// Годы запроса в порядке сервиса.
    pub years: Vec<String>,
    /// Месяц запроса.
    pub month: u8,
    /// Период запроса.
    pub period: u8,
    /// Число строк до постраничной разбивки.
    pub total: u64,
}

impl ReportTable {
    /// Год столбца изменения: наибольший год запроса.
    pub fn change_year(&self) -> Option<i32> {
        sorted_years(&self.years).last().copied()
    }

    /// Столбцы одного семейства: годы в порядке сервиса и столбец изменения.
    pub fn columns(&self) -> Vec<ColumnKey> {
        let mut columns: Vec<ColumnKey> = self
            .years
            .iter()
            .filter_map(|y| parse_year(y).ok())
            .map(ColumnKey::Year)
            .collect();
        if let Some(year) = self.change_year() {
            columns.push(ColumnKey::Change(year));
        }
        columns
    }

    /// Строка по коду инструмента.
    pub fn row(&self, code: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.code == code)
    }

    /// Сортирует строки таблицы на месте.
    #[inline]
    pub fn sort(&mut self, spec: SortSpec) {
        sort_rows(&mut self.rows, spec);
    }

    /// Все нарушения равенства «итог = внутренний рынок + экспорт».
    pub fn total_mismatches(&self) -> Vec<ReportError> {
        self.rows
            .iter()
            .filter_map(|row| row.check_totals().err())
            .collect()
    }
}

/// Устойчивая сортировка строк по значению составного ключа.
///
/// Отсутствующее значение считается нулём, строки не отбрасываются.
pub fn sort_rows(rows: &mut [ReportRow], spec: SortSpec) {
    let key = spec.property;
    rows.sort_by(|a, b| {
        let ord = a.value_or_zero(key).cmp(&b.value_or_zero(key));
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

impl ReportRow {
    /// Проверяет, что итоговые семейства равны сумме внутреннего рынка и экспорта
    /// по каждому году. Возвращает первое найденное нарушение.
    pub fn check_totals(&self) -> Result<(), ReportError> {
        for total in [MetricFamily::TotalSellCount, MetricFamily::TotalSellPrice] {
            let Some(expected) = self.expected_totals(total) else {
                continue;
            };
            let actual = self.metrics.get(&total);
            let years = expected.keys().copied().chain(
                actual
                    .into_iter()
                    .flat_map(|values| values.keys().copied())
                    .filter(|column| matches!(column, ColumnKey::Year(_))),
            );
            for column in years {
                let expected = expected.get(&column).copied().unwrap_or(Decimal::ZERO);
                let actual = actual
                    .and_then(|values| values.get(&column))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                if expected != actual {
                    return Err(ReportError::TotalMismatch {
                        code: self.code.clone(),
                        family: total,
                        column,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Состояние сортировки таблицы: не более одной активной сортировки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    /// Состояние с заданной активной сортировкой.
    #[inline]
    pub const fn with_active(spec: SortSpec) -> Self {
        Self { active: Some(spec) }
    }

    /// Активная сортировка.
    #[inline]
    pub const fn active(&self) -> Option<SortSpec> {
        self.active
    }

    /// Выбор столбца: повторный выбор меняет направление, новый столбец
    /// сортируется по убыванию.
    pub fn select(&mut self, property: MetricKey) -> SortSpec {
        let spec = match self.active {
            Some(active) if active.property == property => SortSpec {
                property,
                direction: active.direction.flipped(),
            },
            _ => SortSpec {
                property,
                direction: SortDirection::Desc,
            },
        };
        self.active = Some(spec);
        spec
    }

    /// Сбрасывает сортировку.
    #[inline]
    pub const fn clear(&mut self) {
        self.active = None;
    }
}

/// Параметры запроса к сервису отчёта.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFilter {
    /// Только избранное подмножество инструментов.
    pub subset: bool,
    /// Годы запроса.
    pub years: Vec<i32>,
    /// Месяц, до которого агрегируются данные.
    pub month: u8,
    /// Длина периода в месяцах.
    pub period: u8,
    /// Сортировка на стороне сервиса.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl ReportFilter {
    /// Запрос по указанным годам, месяц 12, период 1.
    ///
    /// # Пример
    ///
    /// ```
    /// # use activity_report::ReportFilter;
    /// let filter = ReportFilter::new([1402, 1403]).month(6).subset(true);
    /// assert_eq!(filter.period, 1);
    /// ```
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            subset: false,
            years: years.into_iter().collect(),
            month: 12,
            period: 1,
            sort: None,
        }
    }

    /// Только избранное подмножество.
    #[inline]
    #[must_use]
    pub fn subset(mut self, subset: bool) -> Self {
        self.subset = subset;
        self
    }

    /// Месяц.
    #[inline]
    #[must_use]
    pub fn month(mut self, month: u8) -> Self {
        self.month = month;
        self
    }

    /// Период.
    #[inline]
    #[must_use]
    pub fn period(mut self, period: u8) -> Self {
        self.period = period;
        self
    }

    /// Сортировка.
    #[inline]
    #[must_use]
    pub fn sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }
}
