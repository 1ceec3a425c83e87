use std::f64::consts::PI;
use chrono::{DateTime, Local};
use rust_decimal::{Decimal, RoundingStrategy};

/// 弧度转角度并按固定小数位输出
pub fn radians_to_degrees_text(radians: f64, precision: usize) -> String {
    fixed_text(radians * (180.0 / PI), precision)
}

/// 固定小数位文本，按精确值四舍五入（.5 远离零），负零输出为 0
pub fn fixed_text(value: f64, precision: usize) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    match Decimal::from_f64_retain(magnitude) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(precision as u32, RoundingStrategy::MidpointAwayFromZero);
            format!("{}{:.*}", sign, precision, rounded)
        }
        // 超出 Decimal 范围
        None => format!("{}{:.*}", sign, precision, magnitude),
    }
}

/// 数值的最短文本
///
/// 整数部分不超过 21 位、且不小于 1e-6 时按普通小数输出，其余用 `1e+21` / `1.5e-7`
/// 形式的科学计数法；负零输出为 `0`。
pub fn number_text(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // `{:e}` 给出最短的往返数字串，例如 "1.5e-7"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let fraction = if k > 1 { format!(".{}", &digits[1..]) } else { String::new() };
        let exponent_sign = if n > 0 { "+" } else { "-" };
        format!("{}{}e{}{}", &digits[..1], fraction, exponent_sign, (n - 1).abs())
    };

    format!("{}{}", sign, body)
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() {
        Some(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        None
    }
}

/// 将本地时间格式化为 HH:MM:SS.mmm
pub fn format_clock(time: &DateTime<Local>) -> String {
    time.format("%H:%M:%S%.3f").to_string()
}
