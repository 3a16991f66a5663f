//! Сырые ответы сервисов отчёта и истории в формате JSON.

use std::collections::BTreeMap;
use std::io::Read;

use crate::error::ReportError;
use crate::types::{MetricFamily, Money, MonthlyRecord};
use serde::{Deserialize, Deserializer};

/// Год в ответе сервиса встречается и числом, и строкой.
#[derive(Deserialize)]
#[serde(untagged)]
enum YearRepr {
    Number(i32),
    Text(String),
}

impl YearRepr {
    fn into_year(self) -> Result<i32, ReportError> {
        match self {
            Self::Number(year) => Ok(year),
            Self::Text(text) => crate::parser::parse_year(&text),
        }
    }

    fn into_label(self) -> String {
        match self {
            Self::Number(year) => year.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Десериализует год из числа или строки.
pub(crate) fn deserialize_year<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<i32, D::Error> {
    YearRepr::deserialize(deserializer)?
        .into_year()
        .map_err(serde::de::Error::custom)
}

fn deserialize_year_labels<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(Vec::<YearRepr>::deserialize(deserializer)?
        .into_iter()
        .map(YearRepr::into_label)
        .collect())
}

/// Строка отчёта в том виде, в котором её отдаёт сервис.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReportRow {
    /// Код инструмента.
    pub code: String,
    /// RSI.
    #[serde(default)]
    pub rsi: Option<Money>,
    /// Внешний идентификатор.
    #[serde(default, alias = "rahavardId")]
    pub external_id: Option<i64>,
    /// Идентификатор на бирже.
    #[serde(default, alias = "tehranExchangeId")]
    pub exchange_id: Option<String>,
    /// Количество, внутренний рынок.
    #[serde(default)]
    pub domestic_sell_count: Option<BTreeMap<String, Money>>,
    /// Выручка, внутренний рынок.
    #[serde(default)]
    pub domestic_sell_price: Option<BTreeMap<String, Money>>,
    /// Количество, экспорт.
    #[serde(default)]
    pub export_sell_count: Option<BTreeMap<String, Money>>,
    /// Выручка, экспорт.
    #[serde(default)]
    pub export_sell_price: Option<BTreeMap<String, Money>>,
    /// Количество, всего.
    #[serde(default)]
    pub total_sell_count: Option<BTreeMap<String, Money>>,
    /// Выручка, всего.
    #[serde(default)]
    pub total_sell_price: Option<BTreeMap<String, Money>>,
}

impl RawReportRow {
    /// Семейства метрик вместе с их сырыми словарями.
    pub(crate) fn families(&self) -> [(MetricFamily, Option<&BTreeMap<String, Money>>); 6] {
        [
            (MetricFamily::DomesticSellCount, self.domestic_sell_count.as_ref()),
            (MetricFamily::DomesticSellPrice, self.domestic_sell_price.as_ref()),
            (MetricFamily::ExportSellCount, self.export_sell_count.as_ref()),
            (MetricFamily::ExportSellPrice, self.export_sell_price.as_ref()),
            (MetricFamily::TotalSellCount, self.total_sell_count.as_ref()),
            (MetricFamily::TotalSellPrice, self.total_sell_price.as_ref()),
        ]
    }
}

/// Ответ сервиса отчёта о деятельности без разбора ключей.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReportTable {
    /// Строки отчёта.
    pub records: Vec<RawReportRow>,
    /// Годы запроса в порядке сервиса.
    #[serde(deserialize_with = "deserialize_year_labels")]
    pub years: Vec<String>,
    /// Месяц запроса.
    pub month: u8,
    /// Период запроса.
    pub period: u8,
    /// Число строк до постраничной разбивки.
    pub total: u64,
}

impl RawReportTable {
    /// Читает ответ из произвольного `Read`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Создаёт ответ из готовой JSON-строки.
    #[inline]
    pub fn from_json(s: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Помесячная история одного инструмента.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawHistory {
    /// Записи в порядке сервиса.
    pub records: Vec<MonthlyRecord>,
}

impl RawHistory {
    /// Читает историю из произвольного `Read`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Создаёт историю из готовой JSON-строки.
    #[inline]
    pub fn from_json(s: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(s)?)
    }
}
