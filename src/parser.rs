//! Разбор строковых ключей сервиса и преобразование сырых строк отчёта.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ReportError;
use crate::raw::{RawReportRow, RawReportTable};
use crate::report::ReportTable;
use crate::types::{ColumnKey, FamilyValues, MetricFamily, MetricKey, Money, ReportRow};
use crate::utils::normalize_number;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(change\.)?(\d{1,6})$").expect("valid column regex"));

static METRIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)_((?:change\.)?\d{1,6})$").expect("valid metric key regex")
});

/// Разбирает год, записанный числом или строкой (`"1403"`, `" 1 403 "`).
pub fn parse_year(value: &str) -> Result<i32, ReportError> {
    normalize_number(value)
        .parse::<i32>()
        .map_err(|_| ReportError::Year {
            value: value.trim().to_string(),
        })
}

/// Сортирует строковые годы по числовому значению, а не лексикографически.
///
/// Нечисловые значения отбрасываются.
pub fn sorted_years<S: AsRef<str>>(years: &[S]) -> Vec<i32> {
    let mut parsed: Vec<i32> = years
        .iter()
        .filter_map(|y| parse_year(y.as_ref()).ok())
        .collect();
    parsed.sort_unstable();
    parsed.dedup();
    parsed
}

impl FromStr for ColumnKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = COLUMN_RE
            .captures(s.trim())
            .ok_or_else(|| ReportError::ColumnKey {
                value: s.to_string(),
            })?;
        let year = parse_year(&caps[2])?;
        if caps.get(1).is_some() {
            Ok(Self::Change(year))
        } else {
            Ok(Self::Year(year))
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Change(year) => write!(f, "change.{year}"),
        }
    }
}

impl FromStr for MetricFamily {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| ReportError::MetricKey {
                value: s.to_string(),
            })
    }
}

impl FromStr for MetricKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = METRIC_RE
            .captures(s.trim())
            .ok_or_else(|| ReportError::MetricKey {
                value: s.to_string(),
            })?;
        let family = caps[1].parse::<MetricFamily>()?;
        let column = caps[2].parse::<ColumnKey>()?;
        Ok(Self { family, column })
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.family, self.column)
    }
}

impl Serialize for MetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Переводит словарь `{"1402": .., "change.1403": ..}` в типизированные столбцы.
fn parse_family(
    family: MetricFamily,
    raw: &BTreeMap<String, Money>,
) -> Result<FamilyValues, ReportError> {
    let mut values = FamilyValues::new();
    for (key, value) in raw {
        let column = key.parse::<ColumnKey>()?;
        if values.insert(column, *value).is_some() {
            tracing::warn!(%family, key = %key, "duplicate column key, last value wins");
        }
    }
    Ok(values)
}

impl RawReportRow {
    /// Преобразует сырую строку в типизированную.
    pub fn parse(&self) -> Result<ReportRow, ReportError> {
        let mut row = ReportRow {
            code: self.code.clone(),
            rsi: self.rsi,
            external_id: self.external_id,
            exchange_id: self.exchange_id.clone(),
            ..ReportRow::default()
        };
        for (family, raw) in self.families() {
            if let Some(raw) = raw {
                row.metrics.insert(family, parse_family(family, raw)?);
            }
        }
        Ok(row)
    }
}

impl RawReportTable {
    /// Преобразует ответ сервиса в таблицу отчёта.
    pub fn parse(&self) -> Result<ReportTable, ReportError> {
        for year in &self.years {
            parse_year(year)?;
        }
        let rows = self
            .records
            .iter()
            .map(RawReportRow::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReportTable {
            rows,
            years: self.years.clone(),
            month: self.month,
            period: self.period,
            total: self.total,
        })
    }
}
