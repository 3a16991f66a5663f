//! Состояние экранов: последний полученный снимок отчёта и история инструмента.
//!
//! Сетевые запросы выполняет внешний клиент; сюда попадает уже готовый
//! результат. Новый снимок целиком заменяет предыдущий, ошибка сервиса
//! не затирает последние корректные данные.

use crate::chart::{ChartInput, ChartProjector};
use crate::error::ReportError;
use crate::report::{ReportFilter, ReportTable, SortState};
use crate::types::{Metric, MetricKey, MonthlyRecord, SortSpec, ViewMode};

/// Экран отчёта о деятельности.
#[derive(Debug, Clone)]
pub struct ReportSession {
    filter: ReportFilter,
    sort: SortState,
    table: Option<ReportTable>,
    stale: bool,
}

impl ReportSession {
    /// Создаёт экран с начальными параметрами запроса.
    pub fn new(filter: ReportFilter) -> Self {
        let sort = filter
            .sort
            .map_or_else(SortState::default, SortState::with_active);
        Self {
            filter,
            sort,
            table: None,
            stale: false,
        }
    }

    /// Параметры следующего запроса с учётом активной сортировки.
    #[inline]
    pub const fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    /// Последняя корректно полученная таблица.
    #[inline]
    pub const fn table(&self) -> Option<&ReportTable> {
        self.table.as_ref()
    }

    /// Последний ответ сервиса был ошибкой, показываются старые данные.
    #[inline]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Активная сортировка.
    #[inline]
    pub const fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.active()
    }

    /// Заменяет параметры запроса; активная сортировка сохраняется.
    pub fn set_filter(&mut self, filter: ReportFilter) {
        self.filter = filter.sort(self.sort.active());
    }

    /// Принимает результат запроса отчёта.
    pub fn apply_report(&mut self, result: Result<ReportTable, ReportError>) {
        match result {
            Ok(mut table) => {
                for mismatch in table.total_mismatches() {
                    tracing::warn!(error = %mismatch, "report violates total invariant");
                }
                if let Some(spec) = self.sort.active() {
                    table.sort(spec);
                }
                tracing::debug!(
                    rows = table.rows.len(),
                    total = table.total,
                    "report snapshot applied"
                );
                self.table = Some(table);
                self.stale = false;
            }
            Err(err) => {
                tracing::warn!(error = %err, "report fetch failed, keeping previous snapshot");
                self.stale = true;
            }
        }
    }

    /// Клик по заголовку столбца: переключает сортировку и пересортировывает
    /// текущий снимок.
    pub fn select_sort(&mut self, property: MetricKey) -> SortSpec {
        let spec = self.sort.select(property);
        self.filter.sort = Some(spec);
        if let Some(table) = self.table.as_mut() {
            table.sort(spec);
        }
        spec
    }
}

/// Состояние загрузки истории инструмента.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HistoryState {
    /// Инструмент не выбран.
    #[default]
    Idle,
    /// Запрос выполняется.
    Loading,
    /// История получена.
    Loaded(Vec<MonthlyRecord>),
    /// Сервис вернул ошибку: данных нет.
    Unavailable,
}

/// Экран истории инструмента с выбором метрики и режима.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    code: Option<String>,
    state: HistoryState,
    metric: Metric,
    view: ViewMode,
}

impl HistoryView {
    /// Выбранный инструмент.
    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Состояние загрузки.
    #[inline]
    pub const fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Выбранная метрика.
    #[inline]
    pub const fn metric(&self) -> Metric {
        self.metric
    }

    /// Выбранный режим.
    #[inline]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    /// Выбор инструмента: прежние данные сбрасываются до ответа сервиса.
    pub fn select(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
        self.state = HistoryState::Loading;
    }

    /// Принимает результат запроса истории.
    ///
    /// Ответ по другому инструменту, чем выбранный сейчас, игнорируется.
    pub fn apply_history(&mut self, code: &str, result: Result<Vec<MonthlyRecord>, ReportError>) {
        if self.code.as_deref() != Some(code) {
            tracing::debug!(
                code,
                selected = ?self.code,
                "history for unselected instrument dropped"
            );
            return;
        }
        self.state = match result {
            Ok(records) => HistoryState::Loaded(records),
            Err(err) => {
                tracing::warn!(code, error = %err, "history fetch failed");
                HistoryState::Unavailable
            }
        };
    }

    /// Смена метрики.
    #[inline]
    pub const fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    /// Смена режима.
    #[inline]
    pub const fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Пересчитывает график по текущим данным; без данных график пустой.
    pub fn chart(&self, projector: &ChartProjector) -> ChartInput {
        let records: &[MonthlyRecord] = match &self.state {
            HistoryState::Loaded(records) => records,
            _ => &[],
        };
        projector
            .clone()
            .metric(self.metric)
            .view(self.view)
            .project(records)
    }
}
