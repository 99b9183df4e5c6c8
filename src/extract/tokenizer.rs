//! 单行账单文本切分
//!
//! 版式启发式: 行尾两个字段依次是数量和金额, 其余前导字段拼成药品名。
//! 不符合该形状的行直接返回 `None` 由调用方过滤掉, 不记为错误。

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::models::RawLineRecord;

/// 至少需要 名称 + 数量 + 金额 三个字段
const MIN_TOKENS: usize = 3;

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// 金额只接受普通十进制写法: 可选符号, 数字, 可选小数部分; 不接受指数形式
fn is_plain_decimal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits, ""),
    };
    !(int_part.is_empty() && frac_part.is_empty())
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

/// 把一行文本解析成候选明细, 不可解析时返回 `None`
pub fn tokenize_line(line: &str) -> Option<RawLineRecord> {
    let tokens: Vec<&str> = line.split(is_separator).filter(|t| !t.is_empty()).collect();
    if tokens.len() < MIN_TOKENS {
        return None;
    }

    let (name_tokens, tail) = tokens.split_at(tokens.len() - 2);
    let quantity = tail[0].parse::<i64>().ok()?;
    if !is_plain_decimal(tail[1]) {
        return None;
    }
    let billed_price = BigDecimal::from_str(tail[1]).ok()?;

    let item_name = name_tokens.join(" ").trim().to_string();
    if item_name.is_empty() {
        return None;
    }

    Some(RawLineRecord {
        item_name,
        quantity,
        billed_price,
    })
}

/// 按通用换行规则切分文本 (\n, \r\n, \r 以及其他行分隔符)
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        matches!(
            c,
            '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
                | '\u{2028}' | '\u{2029}'
        )
    })
}

/// 对整段文本逐行切分, 保持文档顺序
pub fn tokenize_text(text: &str) -> Vec<RawLineRecord> {
    split_lines(text).filter_map(tokenize_line).collect()
}
