//! Вспомогательные функции: нормализация чисел, разбиение на разряды и сложение сумм.

use crate::types::Money;

/// Нормализует числовую строку, удаляя пробелы, знак плюса итд.
pub fn normalize_number(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !matches!(*ch, ' ' | '\u{a0}' | '\u{202f}' | '+'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Вставляет разделитель групп разрядов в строку цифр целой части.
pub fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut output = String::with_capacity(digits.len() + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            output.push(separator);
        }
        output.push(ch);
    }
    output
}

/// Складывает суммы без паники: при переполнении `Decimal` результат насыщается
/// до `Decimal::MAX`/`Decimal::MIN`.
pub fn add_money(lhs: Money, rhs: Money) -> Money {
    lhs.checked_add(rhs).unwrap_or_else(|| {
        tracing::warn!(%lhs, %rhs, "decimal overflow, sum saturated");
        lhs.saturating_add(rhs)
    })
}
