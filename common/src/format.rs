//! 表示・入力の整形ヘルパー
//!
//! 金額は pt-BR（BRL）固定。入力はすべて安全な既定値に丸め込み、エラーにはしない。

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 優先度の下限
pub const PRIORITY_MIN: u8 = 1;
/// 優先度の上限
pub const PRIORITY_MAX: u8 = 10;
/// 優先度の既定値
pub const PRIORITY_DEFAULT: u8 = 5;

const CURRENCY_SYMBOL: &str = "R$";

lazy_static! {
    static ref MONEY_NOISE_RE: Regex = Regex::new(r"[^\d.]+").unwrap();
}

/// 金額を通貨表記に整形（例: `R$ 1.234,56`）
///
/// 記号と数値の間は NBSP。非有限値は 0 として扱う。
///
/// # Examples
/// ```
/// use shared_list_core::format_money;
///
/// assert_eq!(format_money(1234.5), "R$\u{a0}1.234,50");
/// ```
pub fn format_money(value: f64) -> String {
    let value = finite_or_zero(value);
    let amount = format_amount(value.abs());
    if value < 0.0 && amount != "0,00" {
        format!("-{}\u{a0}{}", CURRENCY_SYMBOL, amount)
    } else {
        format!("{}\u{a0}{}", CURRENCY_SYMBOL, amount)
    }
}

/// 金額を記号なしで整形（例: `1.234,56`）
///
/// 編集欄に戻す値はこちらを使う。
pub fn format_amount(value: f64) -> String {
    let value = finite_or_zero(value);
    // 桁は f64 の文字列表現から組む（整数型だと大きな値で飽和する）
    let fixed = format!("{:.2}", value.abs());
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let is_zero = digits.bytes().chain(fraction.bytes()).all(|b| b == b'0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{}{},{}", sign, grouped, fraction)
}

/// ロケール表記の金額入力をパース
///
/// 1. 千区切りの `.` をすべて除去
/// 2. 最初の `,` を小数点に置換
/// 3. 数字と `.` 以外を除去
///
/// 数値にならない入力は 0。結果は小数2桁に丸め、負にはならない。
///
/// # Examples
/// ```
/// use shared_list_core::parse_money;
///
/// assert_eq!(parse_money("R$ 12,5a"), 12.5);
/// assert_eq!(parse_money("abc"), 0.0);
/// ```
pub fn parse_money(input: &str) -> f64 {
    let without_thousands = input.replace('.', "");
    let with_decimal_point = without_thousands.replacen(',', ".", 1);
    let cleaned = MONEY_NOISE_RE.replace_all(&with_decimal_point, "");

    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => round_cents(n).max(0.0),
        _ => 0.0,
    }
}

/// 優先度を 1〜10 に丸め込む（未指定・非有限は既定値 5）
pub fn clamp_priority(input: Option<f64>) -> u8 {
    let raw = match input {
        Some(n) if n.is_finite() => n.round(),
        _ => PRIORITY_DEFAULT as f64,
    };
    raw.clamp(PRIORITY_MIN as f64, PRIORITY_MAX as f64) as u8
}

/// 文字列入力から優先度を得る
pub fn parse_priority(input: &str) -> u8 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return PRIORITY_DEFAULT;
    }
    clamp_priority(trimmed.parse::<f64>().ok())
}

/// グループ名の正規化（前後の空白除去）
pub fn normalize_group(name: &str) -> String {
    name.trim().to_string()
}

/// グループ名の同一性判定キー（大文字小文字を区別しない）
pub fn group_key(name: &str) -> String {
    normalize_group(name).to_lowercase()
}

/// ロケールを考慮した大文字小文字・アクセント非区別の比較
///
/// NFD 分解して結合文字を除去し、小文字化したもの同士を比較する。
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// 非有限値を 0 に置き換える
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 金額入力の丸め込み（非有限・負は 0、小数2桁）
pub fn sanitize_value(value: f64) -> f64 {
    round_cents(finite_or_zero(value)).max(0.0)
}

/// 小数2桁に丸める（100倍で溢れる値はそのまま返す）
fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "R$\u{a0}0,00");
        assert_eq!(format_money(12.5), "R$\u{a0}12,50");
        assert_eq!(format_money(1234567.891), "R$\u{a0}1.234.567,89");
    }

    #[test]
    fn test_format_money_non_finite() {
        assert_eq!(format_money(f64::NAN), "R$\u{a0}0,00");
        assert_eq!(format_money(f64::INFINITY), "R$\u{a0}0,00");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(-3.0), "-R$\u{a0}3,00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(999.999), "1.000,00");
        assert_eq!(format_amount(100.0), "100,00");
        assert_eq!(format_amount(0.05), "0,05");
    }

    #[test]
    fn test_parse_money_locale_input() {
        assert_eq!(parse_money("R$ 12,5a"), 12.5);
        assert_eq!(parse_money("1.234,56"), 1234.56);
        assert_eq!(parse_money("10"), 10.0);
        assert_eq!(parse_money("3,456"), 3.46);
    }

    #[test]
    fn test_format_amount_large_values() {
        assert_eq!(format_amount(1e20), "100.000.000.000.000.000.000,00");
        assert_eq!(format_money(-1e18), "-R$\u{a0}1.000.000.000.000.000.000,00");
    }

    #[test]
    fn test_parse_money_huge_input_stays_finite() {
        let value = parse_money(&format!("1{}", "0".repeat(307)));
        assert!(value.is_finite());
        assert_eq!(value, 1e307);
        assert_eq!(sanitize_value(f64::MAX), f64::MAX);
    }

    #[test]
    fn test_parse_money_without_digits() {
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(parse_money("R$"), 0.0);
        assert_eq!(parse_money("abc"), 0.0);
        assert_eq!(parse_money(","), 0.0);
    }

    #[test]
    fn test_parse_money_never_negative() {
        // マイナス記号はノイズとして除去される
        assert_eq!(parse_money("-5,00"), 5.0);
    }

    #[test]
    fn test_clamp_priority() {
        assert_eq!(clamp_priority(None), 5);
        assert_eq!(clamp_priority(Some(0.0)), 1);
        assert_eq!(clamp_priority(Some(-7.0)), 1);
        assert_eq!(clamp_priority(Some(11.0)), 10);
        assert_eq!(clamp_priority(Some(7.4)), 7);
        assert_eq!(clamp_priority(Some(7.5)), 8);
        assert_eq!(clamp_priority(Some(f64::NAN)), 5);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority(""), 5);
        assert_eq!(parse_priority("  "), 5);
        assert_eq!(parse_priority("x"), 5);
        assert_eq!(parse_priority("42"), 10);
        assert_eq!(parse_priority(" 3 "), 3);
    }

    #[test]
    fn test_compare_text_ignores_case_and_accents() {
        assert_eq!(compare_text("Sabão", "sabao"), Ordering::Equal);
        assert_eq!(compare_text("água", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Leite", "arroz"), Ordering::Greater);
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("  Cozinha "), "cozinha");
        assert_eq!(normalize_group("  Sala "), "Sala");
    }
}
