//! Проекция рядов в обобщённый формат входных данных графика.

use crate::format::ValueFormatter;
use crate::series::{ChartSeries, MONTHS_PER_YEAR, SeriesBuilder};
use crate::types::{Metric, Money, MonthlyRecord, PERSIAN_MONTHS, ViewMode};
use serde::Serialize;

/// Тип отрисовки ряда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Столбцы.
    #[default]
    Column,
    /// Линия.
    Line,
}

/// Точка графика с готовой подсказкой.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedPoint {
    /// Подпись месяца.
    pub label: String,
    /// Значение, `None` если данных нет.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub y: Option<Money>,
    /// Подсказка, если есть значение.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// Ряд графика.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedSeries {
    /// Имя ряда (год).
    pub name: String,
    /// Тип отрисовки.
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    /// Показывать в легенде.
    pub show_in_legend: bool,
    /// Видимость ряда.
    pub visible: bool,
    /// Точки.
    pub points: Vec<ProjectedPoint>,
}

/// Входные данные графика для любой поверхности отрисовки.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    /// Заголовок.
    pub title: String,
    /// Подпись оси X.
    pub axis_x: String,
    /// Подпись оси Y.
    pub axis_y: String,
    /// Ряды по годам в порядке возрастания.
    pub series: Vec<ProjectedSeries>,
}

impl ChartInput {
    /// Пустой график: нет данных по инструменту.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Переключает видимость ряда по клику на легенду.
    ///
    /// Возвращает новую видимость или `None`, если ряда нет.
    pub fn toggle_series(&mut self, name: &str) -> Option<bool> {
        let series = self.series.iter_mut().find(|s| s.name == name)?;
        series.visible = !series.visible;
        Some(series.visible)
    }
}

/// Поверхность отрисовки. Дескриптор графика хранит вызывающая сторона.
pub trait ChartSurface {
    /// Дескриптор отрисованного графика.
    type Handle;

    /// Отрисовывает график и возвращает его дескриптор.
    fn render(&mut self, input: &ChartInput) -> Self::Handle;

    /// Перерисовывает ранее отрисованный график.
    fn redraw(&mut self, handle: &mut Self::Handle, input: &ChartInput);
}

/// Клик по легенде: переключает ряд и перерисовывает график через дескриптор.
pub fn toggle_legend<S: ChartSurface>(
    surface: &mut S,
    handle: &mut S::Handle,
    input: &mut ChartInput,
    name: &str,
) -> Option<bool> {
    let visible = input.toggle_series(name)?;
    surface.redraw(handle, input);
    Some(visible)
}

/// Проектор: выбор метрики и режима, подписи и подсказки.
///
/// Каждый вызов `project` пересчитывает график целиком.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartProjector {
    builder: SeriesBuilder,
    metric: Metric,
    view: ViewMode,
    price: bool,
    kind: SeriesKind,
    title: Option<String>,
    axis_x: Option<String>,
    axis_y: Option<String>,
    formatter: ValueFormatter,
}

impl Default for ChartProjector {
    fn default() -> Self {
        Self::new(PERSIAN_MONTHS)
    }
}

impl ChartProjector {
    /// Создаёт проектор с подписями месяцев.
    ///
    /// # Пример
    ///
    /// ```
    /// # use activity_report::{ChartProjector, MonthlyRecord, ViewMode, PERSIAN_MONTHS};
    /// # use rust_decimal::Decimal;
    /// let records = [MonthlyRecord::new(1403, 1, Decimal::from(156_534), Decimal::ZERO)];
    /// let chart = ChartProjector::new(PERSIAN_MONTHS)
    ///     .view(ViewMode::Cumulative)
    ///     .project(&records);
    /// assert_eq!(chart.title, "Cumulative Stock Activity");
    /// assert_eq!(chart.series[0].points.len(), 12);
    /// ```
    pub fn new<S: Into<String>>(labels: [S; MONTHS_PER_YEAR]) -> Self {
        Self {
            builder: SeriesBuilder::new(labels),
            metric: Metric::default(),
            view: ViewMode::default(),
            price: true,
            kind: SeriesKind::default(),
            title: None,
            axis_x: None,
            axis_y: None,
            formatter: ValueFormatter::default(),
        }
    }

    /// Выбранная метрика.
    #[inline]
    #[must_use]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Режим отображения.
    #[inline]
    #[must_use]
    pub fn view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    /// Значения являются суммами (масштабируются и округляются), иначе количествами.
    #[inline]
    #[must_use]
    pub fn price(mut self, price: bool) -> Self {
        self.price = price;
        self
    }

    /// Тип отрисовки рядов.
    #[inline]
    #[must_use]
    pub fn kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    /// Заголовок вместо стандартного.
    #[inline]
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Подпись оси X вместо стандартной.
    #[inline]
    #[must_use]
    pub fn axis_x(mut self, axis_x: impl Into<String>) -> Self {
        self.axis_x = Some(axis_x.into());
        self
    }

    /// Подпись оси Y вместо стандартной.
    #[inline]
    #[must_use]
    pub fn axis_y(mut self, axis_y: impl Into<String>) -> Self {
        self.axis_y = Some(axis_y.into());
        self
    }

    /// Форматтер значений и подсказок.
    #[inline]
    #[must_use]
    pub fn formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Строит входные данные графика по истории инструмента.
    pub fn project(&self, records: &[MonthlyRecord]) -> ChartInput {
        let series = self
            .builder
            .clone()
            .metric(self.metric)
            .view(self.view)
            .build(records);
        self.project_series(&series)
    }

    /// Подписи берутся из метрики и режима проектора, поэтому ряды
    /// строятся здесь же, в `project`.
    fn project_series(&self, series: &[ChartSeries]) -> ChartInput {
        ChartInput {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| self.default_title().to_string()),
            axis_x: self.axis_x.clone().unwrap_or_else(|| "Month".to_string()),
            axis_y: self.axis_y.clone().unwrap_or_else(|| self.default_axis_y()),
            series: series.iter().map(|s| self.project_one(s)).collect(),
        }
    }

    fn project_one(&self, series: &ChartSeries) -> ProjectedSeries {
        let points = series
            .points
            .iter()
            .map(|point| ProjectedPoint {
                label: point.label.clone(),
                y: point.y.map(|raw| {
                    if self.price {
                        self.formatter.round_price(raw)
                    } else {
                        raw
                    }
                }),
                tooltip: point.y.map(|raw| {
                    format!(
                        "{}: {}",
                        series.name,
                        self.formatter.format_tooltip(raw, self.price)
                    )
                }),
            })
            .collect();

        ProjectedSeries {
            name: series.name.clone(),
            kind: self.kind,
            show_in_legend: true,
            visible: true,
            points,
        }
    }

    const fn default_title(&self) -> &'static str {
        match self.view {
            ViewMode::Pointwise => "Stock Activity by Month",
            ViewMode::Cumulative => "Cumulative Stock Activity",
        }
    }

    fn default_axis_y(&self) -> String {
        let metric = match self.metric {
            Metric::Domestic => "Domestic Sales",
            Metric::Export => "Export Sales",
            Metric::Total => "Total Sales",
        };
        let prefix = match self.view {
            ViewMode::Pointwise => "",
            ViewMode::Cumulative => "Cumulative ",
        };
        if self.price {
            format!("{prefix}{metric} ({})", self.formatter.unit())
        } else {
            format!("{prefix}{metric}")
        }
    }
}
