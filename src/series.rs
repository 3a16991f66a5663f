//! Группировка помесячных записей по годам и построение рядов графика.

use std::collections::BTreeMap;

use crate::types::{Metric, Money, MonthlyRecord, PERSIAN_MONTHS, ViewMode};
use crate::utils::add_money;
use rust_decimal::Decimal;
use serde::Serialize;

/// Число месяцев в году местного календаря.
pub const MONTHS_PER_YEAR: usize = 12;

/// Записи одного года, упорядоченные по месяцу.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearGroup {
    /// Год.
    pub year: i32,
    /// Записи года по возрастанию месяца; порядок дублей сохраняется.
    pub records: Vec<MonthlyRecord>,
}

/// Разбивает записи по годам, годы идут по возрастанию числового значения.
pub fn group_by_year(records: &[MonthlyRecord]) -> Vec<YearGroup> {
    let mut groups: BTreeMap<i32, Vec<MonthlyRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.year).or_default().push(*record);
    }

    groups
        .into_iter()
        .map(|(year, mut records)| {
            records.sort_by_key(|r| r.month);
            YearGroup { year, records }
        })
        .collect()
}

/// Точка ряда: подпись месяца и значение (`None`, если данных нет).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Подпись месяца.
    pub label: String,
    /// Значение.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub y: Option<Money>,
}

/// Ряд одного года: ровно 12 точек в календарном порядке.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    /// Подпись ряда (год).
    pub name: String,
    /// Год.
    pub year: i32,
    /// Точки по месяцам.
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Значения точек без подписей.
    pub fn values(&self) -> Vec<Option<Money>> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// Построитель рядов по годам для выбранной метрики и режима.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesBuilder {
    labels: [String; MONTHS_PER_YEAR],
    view: ViewMode,
    metric: Metric,
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self::new(PERSIAN_MONTHS)
    }
}

impl SeriesBuilder {
    /// Создаёт построитель с подписями месяцев.
    pub fn new<S: Into<String>>(labels: [S; MONTHS_PER_YEAR]) -> Self {
        Self {
            labels: labels.map(Into::into),
            view: ViewMode::default(),
            metric: Metric::default(),
        }
    }

    /// Режим отображения.
    #[inline]
    #[must_use]
    pub fn view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    /// Выбранная метрика.
    #[inline]
    #[must_use]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Подписи месяцев.
    #[inline]
    pub const fn labels(&self) -> &[String; MONTHS_PER_YEAR] {
        &self.labels
    }

    /// Строит по одному ряду на каждый год, присутствующий во входных данных.
    pub fn build(&self, records: &[MonthlyRecord]) -> Vec<ChartSeries> {
        let groups = group_by_year(records);
        tracing::debug!(
            records = records.len(),
            years = groups.len(),
            view = ?self.view,
            metric = ?self.metric,
            "building series"
        );
        groups.iter().map(|group| self.build_year(group)).collect()
    }

    fn build_year(&self, group: &YearGroup) -> ChartSeries {
        let slots = month_slots(group, self.metric);
        let values: [Option<Money>; MONTHS_PER_YEAR] = match self.view {
            ViewMode::Pointwise => slots,
            ViewMode::Cumulative => running_totals(slots),
        };

        let points = self
            .labels
            .iter()
            .zip(values)
            .map(|(label, y)| ChartPoint {
                label: label.clone(),
                y,
            })
            .collect();

        ChartSeries {
            name: group.year.to_string(),
            year: group.year,
            points,
        }
    }
}

/// Раскладывает записи года по месяцам; при повторе месяца побеждает последняя запись.
fn month_slots(group: &YearGroup, metric: Metric) -> [Option<Money>; MONTHS_PER_YEAR] {
    let mut slots = [None; MONTHS_PER_YEAR];
    for record in &group.records {
        if !(1..=12).contains(&record.month) {
            tracing::warn!(
                year = record.year,
                month = record.month,
                "month out of range, record skipped"
            );
            continue;
        }
        let slot = &mut slots[usize::from(record.month - 1)];
        if slot.is_some() {
            tracing::warn!(
                year = record.year,
                month = record.month,
                "duplicate month, last record wins"
            );
        }
        *slot = Some(metric.value(record));
    }
    slots
}

/// Нарастающий итог; до первой записи года значение остаётся `None`.
fn running_totals(slots: [Option<Money>; MONTHS_PER_YEAR]) -> [Option<Money>; MONTHS_PER_YEAR] {
    let mut running: Option<Money> = None;
    slots.map(|slot| {
        if let Some(value) = slot {
            running = Some(add_money(running.unwrap_or(Decimal::ZERO), value));
        }
        running
    })
}
