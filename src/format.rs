//! Форматирование величин для отображения: количества, суммы, проценты.
//!
//! Все функции тотальны: отсутствующее значение превращается в документированное
//! значение по умолчанию, ошибок не бывает.

use crate::types::Money;
use crate::utils::group_digits;
use rust_decimal::{Decimal, RoundingStrategy};

/// Делитель, переводящий сырую сумму в миллиарды томанов.
pub const PRICE_SCALE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Подпись единицы измерения сумм по умолчанию.
pub const DEFAULT_UNIT: &str = "میلیارد تومان";

/// Разделители разрядов и дробной части.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    /// Разделитель групп разрядов.
    pub group: char,
    /// Десятичный разделитель.
    pub decimal: char,
}

impl NumberLocale {
    /// `1,234.5`
    pub const EN: Self = Self {
        group: ',',
        decimal: '.',
    };
    /// `1٬234٫5`
    pub const FA: Self = Self {
        group: '\u{066c}',
        decimal: '\u{066b}',
    };
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::EN
    }
}

/// Форматтер величин с настраиваемым масштабом сумм и локалью.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFormatter {
    price_scale: Decimal,
    locale: NumberLocale,
    unit: String,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self {
            price_scale: PRICE_SCALE,
            locale: NumberLocale::EN,
            unit: DEFAULT_UNIT.to_string(),
        }
    }
}

impl ValueFormatter {
    /// Builder с настройками по умолчанию.
    ///
    /// # Пример
    ///
    /// ```
    /// # use activity_report::{NumberLocale, ValueFormatter};
    /// # use rust_decimal::Decimal;
    /// let formatter = ValueFormatter::builder()
    ///     .locale(NumberLocale::FA)
    ///     .unit("B")
    ///     .build();
    /// assert_eq!(formatter.format_price(Decimal::from(12_000_000)), "1٬200");
    /// ```
    #[inline]
    pub fn builder() -> ValueFormatterBuilder {
        ValueFormatterBuilder {
            inner: Self::default(),
        }
    }

    /// Подпись единицы измерения сумм.
    #[inline]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Количество с разбиением на разряды; `0` и отсутствие дают `"0"`.
    pub fn format_count(&self, value: impl Into<Option<Money>>) -> String {
        match value.into() {
            Some(v) if !v.is_zero() => self.render(v, 0, true),
            _ => "0".to_string(),
        }
    }

    /// Сумма в миллиардах томанов с точностью, зависящей от порядка величины.
    ///
    /// Меньше 10: два знака; меньше 100: один; меньше 1000: целое без разрядов;
    /// иначе целое с разбиением на разряды.
    pub fn format_price(&self, value: impl Into<Option<Money>>) -> String {
        let scaled = self.scaled(value.into().unwrap_or(Decimal::ZERO));
        let (dp, grouped) = price_precision(scaled);
        self.render(scaled, dp, grouped)
    }

    /// То же округление, что и в `format_price`, но числом (для точек графика).
    pub fn round_price(&self, value: Money) -> Money {
        let scaled = self.scaled(value);
        let (dp, _) = price_precision(scaled);
        scaled.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Процент, округлённый до целого; `0` и отсутствие дают `"0%"`.
    pub fn format_percentage(&self, value: impl Into<Option<Money>>) -> String {
        match value.into() {
            Some(v) if !v.is_zero() => format!("{}%", self.render(v, 0, true)),
            _ => "0%".to_string(),
        }
    }

    /// Подробное значение для всплывающей подсказки: всегда два знака,
    /// для сумм с подписью единицы.
    pub fn format_tooltip(&self, value: impl Into<Option<Money>>, is_price: bool) -> String {
        let value = value.into().unwrap_or(Decimal::ZERO);
        if is_price {
            format!("{} {}", self.render(self.scaled(value), 2, true), self.unit)
        } else {
            self.render(value, 2, true)
        }
    }

    fn scaled(&self, value: Money) -> Money {
        value.checked_div(self.price_scale).unwrap_or(value)
    }

    fn render(&self, value: Money, dp: u32, grouped: bool) -> String {
        let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded = rounded.abs();
        rounded.rescale(dp);

        let text = rounded.to_string();
        let (int_part, frac_part) = text
            .split_once('.')
            .map_or((text.as_str(), None), |(i, f)| (i, Some(f)));

        let mut output = String::with_capacity(text.len() + 4);
        if negative {
            output.push('-');
        }
        if grouped {
            output.push_str(&group_digits(int_part, self.locale.group));
        } else {
            output.push_str(int_part);
        }
        if let Some(frac) = frac_part {
            output.push(self.locale.decimal);
            output.push_str(frac);
        }
        output
    }
}

/// Число знаков и признак разбиения на разряды для суммы в миллиардах.
fn price_precision(scaled: Money) -> (u32, bool) {
    if scaled < Decimal::TEN {
        (2, false)
    } else if scaled < Decimal::ONE_HUNDRED {
        (1, false)
    } else if scaled < Decimal::ONE_THOUSAND {
        (0, false)
    } else {
        (0, true)
    }
}

/// Builder для `ValueFormatter`.
#[derive(Debug, Clone)]
pub struct ValueFormatterBuilder {
    inner: ValueFormatter,
}

impl ValueFormatterBuilder {
    /// Делитель сумм; нулевой делитель игнорируется.
    #[inline]
    #[must_use]
    pub fn price_scale(mut self, scale: Decimal) -> Self {
        if scale.is_zero() {
            tracing::warn!("zero price scale ignored");
        } else {
            self.inner.price_scale = scale;
        }
        self
    }

    /// Разделители разрядов.
    #[inline]
    #[must_use]
    pub fn locale(mut self, locale: NumberLocale) -> Self {
        self.inner.locale = locale;
        self
    }

    /// Подпись единицы измерения сумм.
    #[inline]
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.inner.unit = unit.into();
        self
    }

    /// Возвращает готовый форматтер.
    #[inline]
    pub fn build(self) -> ValueFormatter {
        self.inner
    }
}

/// `ValueFormatter::format_count` с настройками по умолчанию.
pub fn format_count(value: impl Into<Option<Money>>) -> String {
    ValueFormatter::default().format_count(value)
}

/// `ValueFormatter::format_price` с указанным делителем.
pub fn format_price(value: impl Into<Option<Money>>, scale: Decimal) -> String {
    ValueFormatter::builder()
        .price_scale(scale)
        .build()
        .format_price(value)
}

/// `ValueFormatter::format_percentage` с настройками по умолчанию.
pub fn format_percentage(value: impl Into<Option<Money>>) -> String {
    ValueFormatter::default().format_percentage(value)
}

/// `ValueFormatter::format_tooltip` с настройками по умолчанию.
pub fn format_tooltip(value: impl Into<Option<Money>>, is_price: bool) -> String {
    ValueFormatter::default().format_tooltip(value, is_price)
}
