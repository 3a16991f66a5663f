//! Доменные типы: помесячные записи, метрики отчёта и ключи сортировки.

use crate::utils::add_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Названия месяцев местного (солнечного хиджры) календаря по умолчанию.
pub const PERSIAN_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Продажи инструмента за один наблюдаемый месяц.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Год (местный календарь).
    #[serde(deserialize_with = "crate::raw::deserialize_year")]
    pub year: i32,
    /// Месяц, 1–12.
    pub month: u8,
    /// Внутренние продажи.
    pub domestic: Money,
    /// Экспорт; в ранних версиях сервиса поле отсутствует.
    #[serde(default)]
    pub export: Money,
}

impl MonthlyRecord {
    /// Создаёт запись за месяц.
    #[inline]
    pub const fn new(year: i32, month: u8, domestic: Money, export: Money) -> Self {
        Self {
            year,
            month,
            domestic,
            export,
        }
    }
}

/// Выбранная метрика помесячной истории.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Внутренние продажи.
    #[default]
    Domestic,
    /// Экспорт.
    Export,
    /// Сумма внутренних продаж и экспорта.
    Total,
}

impl Metric {
    /// Значение метрики в записи; итог считается на лету.
    #[inline]
    pub fn value(self, record: &MonthlyRecord) -> Money {
        match self {
            Self::Domestic => record.domestic,
            Self::Export => record.export,
            Self::Total => add_money(record.domestic, record.export),
        }
    }
}

/// Режим отображения ряда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Значения по месяцам.
    #[default]
    #[serde(rename = "simple")]
    Pointwise,
    /// Нарастающий итог с начала года.
    #[serde(rename = "sum")]
    Cumulative,
}

/// Семейство метрик строки отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricFamily {
    /// Количество, внутренний рынок.
    DomesticSellCount,
    /// Выручка, внутренний рынок.
    DomesticSellPrice,
    /// Количество, экспорт.
    ExportSellCount,
    /// Выручка, экспорт.
    ExportSellPrice,
    /// Количество, всего.
    TotalSellCount,
    /// Выручка, всего.
    TotalSellPrice,
}

impl MetricFamily {
    /// Все семейства в порядке столбцов отчёта.
    pub const ALL: [Self; 6] = [
        Self::DomesticSellCount,
        Self::DomesticSellPrice,
        Self::ExportSellCount,
        Self::ExportSellPrice,
        Self::TotalSellCount,
        Self::TotalSellPrice,
    ];

    /// Имя семейства в формате сервиса.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomesticSellCount => "domesticSellCount",
            Self::DomesticSellPrice => "domesticSellPrice",
            Self::ExportSellCount => "exportSellCount",
            Self::ExportSellPrice => "exportSellPrice",
            Self::TotalSellCount => "totalSellCount",
            Self::TotalSellPrice => "totalSellPrice",
        }
    }

    /// Денежное ли семейство (форматируется через `format_price`).
    #[inline]
    pub const fn is_price(self) -> bool {
        matches!(
            self,
            Self::DomesticSellPrice | Self::ExportSellPrice | Self::TotalSellPrice
        )
    }

    /// Для итоговых семейств возвращает пару (внутренний рынок, экспорт).
    pub const fn components(self) -> Option<(Self, Self)> {
        match self {
            Self::TotalSellCount => Some((Self::DomesticSellCount, Self::ExportSellCount)),
            Self::TotalSellPrice => Some((Self::DomesticSellPrice, Self::ExportSellPrice)),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Столбец внутри семейства: год или изменение к прошлому году.
///
/// Годы упорядочены раньше столбца изменения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    /// Значение за год.
    Year(i32),
    /// Процент изменения указанного года к предыдущему.
    Change(i32),
}

/// Составной ключ метрики: семейство и столбец.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricKey {
    /// Семейство.
    pub family: MetricFamily,
    /// Столбец.
    pub column: ColumnKey,
}

impl MetricKey {
    /// Создаёт ключ.
    #[inline]
    pub const fn new(family: MetricFamily, column: ColumnKey) -> Self {
        Self { family, column }
    }
}

/// Направление сортировки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// По возрастанию.
    Asc,
    /// По убыванию.
    #[default]
    Desc,
}

impl SortDirection {
    /// Противоположное направление.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Активная сортировка таблицы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Ключ сортировки.
    pub property: MetricKey,
    /// Направление.
    pub direction: SortDirection,
}

/// Значения одного семейства по столбцам.
pub type FamilyValues = BTreeMap<ColumnKey, Money>;

/// Строка отчёта по одному инструменту.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportRow {
    /// Код (тикер) инструмента.
    pub code: String,
    /// RSI, если сервис его передаёт.
    pub rsi: Option<Money>,
    /// Внешний идентификатор инструмента.
    pub external_id: Option<i64>,
    /// Идентификатор на бирже.
    pub exchange_id: Option<String>,
    /// Метрики по семействам.
    pub metrics: BTreeMap<MetricFamily, FamilyValues>,
}

impl ReportRow {
    /// Создаёт пустую строку для инструмента.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Собирает строку из внутренних и экспортных значений, итоги считаются суммой.
    ///
    /// Столбцы изменения итоговых семейств не вычисляются: их передаёт сервис.
    pub fn from_parts(
        code: impl Into<String>,
        domestic_count: FamilyValues,
        domestic_price: FamilyValues,
        export_count: FamilyValues,
        export_price: FamilyValues,
    ) -> Self {
        let mut row = Self::new(code);
        row.metrics.insert(MetricFamily::DomesticSellCount, domestic_count);
        row.metrics.insert(MetricFamily::DomesticSellPrice, domestic_price);
        row.metrics.insert(MetricFamily::ExportSellCount, export_count);
        row.metrics.insert(MetricFamily::ExportSellPrice, export_price);

        for total in [MetricFamily::TotalSellCount, MetricFamily::TotalSellPrice] {
            if let Some(expected) = row.expected_totals(total) {
                row.metrics.insert(total, expected);
            }
        }
        row
    }

    /// Значение по составному ключу.
    #[inline]
    pub fn value(&self, key: MetricKey) -> Option<Money> {
        self.metrics
            .get(&key.family)
            .and_then(|values| values.get(&key.column))
            .copied()
    }

    /// Значение по ключу; отсутствующее считается нулём.
    #[inline]
    pub fn value_or_zero(&self, key: MetricKey) -> Money {
        self.value(key).unwrap_or(Decimal::ZERO)
    }

    /// Записывает значение по составному ключу.
    pub fn set(&mut self, key: MetricKey, value: Money) {
        self.metrics
            .entry(key.family)
            .or_default()
            .insert(key.column, value);
    }

    /// Суммы внутренних продаж и экспорта по годам для итогового семейства.
    pub(crate) fn expected_totals(&self, total: MetricFamily) -> Option<FamilyValues> {
        let (domestic, export) = total.components()?;
        let empty = FamilyValues::new();
        let domestic = self.metrics.get(&domestic).unwrap_or(&empty);
        let export = self.metrics.get(&export).unwrap_or(&empty);

        let mut sums = FamilyValues::new();
        for (column, value) in domestic.iter().chain(export.iter()) {
            if matches!(column, ColumnKey::Year(_)) {
                let sum = sums.entry(*column).or_insert(Decimal::ZERO);
                *sum = add_money(*sum, *value);
            }
        }
        Some(sums)
    }
}
