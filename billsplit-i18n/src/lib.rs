#[cfg(all(feature = "ja", feature = "en"))]
compile_error!("Cannot enable both 'ja' and 'en' features at the same time");

use std::fmt;

#[cfg(feature = "ja")]
pub mod strings {
    pub const SUMMARY_TITLE: &str = "割り勘の内訳";
    pub const DETAILED_TITLE: &str = "割り勘の明細";
    pub const SUBTOTAL: &str = "小計";
    pub const TIP: &str = "チップ";
    pub const TAX: &str = "税";
    pub const TOTAL: &str = "合計";
    pub const GRAND_TOTAL: &str = "総合計";
    pub const NO_ITEMS_ASSIGNED: &str = "(割り当てられた品目なし)";
    pub const NO_SAVED_SPLITS: &str = "保存された割り勘はありません。";
    pub const RECONCILED: &str = "検算: 一致";
    pub const SPLIT_SAVED: &str = "保存しました";
    pub const SPLIT_DELETED: &str = "削除しました";
    pub const USAGE: &str = "使い方:
  billsplit show <file.bill> [--detailed]
  billsplit save <file.bill> <name>
  billsplit history
  billsplit recall <id> [--detailed]
  billsplit forget <id>";
}

#[cfg(not(feature = "ja"))]
pub mod strings {
    pub const SUMMARY_TITLE: &str = "Bill Split Summary";
    pub const DETAILED_TITLE: &str = "Detailed Bill Split";
    pub const SUBTOTAL: &str = "Subtotal";
    pub const TIP: &str = "Tip";
    pub const TAX: &str = "Tax";
    pub const TOTAL: &str = "Total";
    pub const GRAND_TOTAL: &str = "Grand Total";
    pub const NO_ITEMS_ASSIGNED: &str = "(no items assigned)";
    pub const NO_SAVED_SPLITS: &str = "No saved splits.";
    pub const RECONCILED: &str = "Check: reconciled";
    pub const SPLIT_SAVED: &str = "Saved";
    pub const SPLIT_DELETED: &str = "Deleted";
    pub const USAGE: &str = "Usage:
  billsplit show <file.bill> [--detailed]
  billsplit save <file.bill> <name>
  billsplit history
  billsplit recall <id> [--detailed]
  billsplit forget <id>";
}

pub use strings::*;

#[cfg(feature = "ja")]
pub fn split_ways(count: usize) -> String {
    format!("{count}人で割り勘")
}

#[cfg(not(feature = "ja"))]
pub fn split_ways(count: usize) -> String {
    format!("split {count} ways")
}

#[cfg(feature = "ja")]
pub fn weighted_share(weight: impl fmt::Display, total: impl fmt::Display) -> String {
    format!("{weight}/{total} の持ち分")
}

#[cfg(not(feature = "ja"))]
pub fn weighted_share(weight: impl fmt::Display, total: impl fmt::Display) -> String {
    format!("{weight}/{total} share")
}

#[cfg(feature = "ja")]
pub fn undefined_person(name: impl fmt::Display) -> String {
    format!("未定義の人物 '{name}' です")
}

#[cfg(not(feature = "ja"))]
pub fn undefined_person(name: impl fmt::Display) -> String {
    format!("Undefined person '{name}'")
}

#[cfg(feature = "ja")]
pub fn duplicate_person(name: impl fmt::Display) -> String {
    format!("人物 '{name}' が重複しています")
}

#[cfg(not(feature = "ja"))]
pub fn duplicate_person(name: impl fmt::Display) -> String {
    format!("Person '{name}' is declared twice")
}

#[cfg(feature = "ja")]
pub fn invalid_percent(value: impl fmt::Display) -> String {
    format!("パーセント値 '{value}' が不正です")
}

#[cfg(not(feature = "ja"))]
pub fn invalid_percent(value: impl fmt::Display) -> String {
    format!("Invalid percentage '{value}'")
}

#[cfg(feature = "ja")]
pub fn invalid_weight(value: impl fmt::Display) -> String {
    format!("重み '{value}' が不正です")
}

#[cfg(not(feature = "ja"))]
pub fn invalid_weight(value: impl fmt::Display) -> String {
    format!("Invalid weight '{value}'")
}

#[cfg(feature = "ja")]
pub fn empty_custom_weights() -> &'static str {
    "重みがすべて0です"
}

#[cfg(not(feature = "ja"))]
pub fn empty_custom_weights() -> &'static str {
    "All custom weights are zero"
}

#[cfg(feature = "ja")]
pub fn split_not_found(id: impl fmt::Display) -> String {
    format!("ID '{id}' の割り勘は見つかりません")
}

#[cfg(not(feature = "ja"))]
pub fn split_not_found(id: impl fmt::Display) -> String {
    format!("No saved split with id '{id}'")
}

#[cfg(feature = "ja")]
pub fn ambiguous_split_id(id: impl fmt::Display) -> String {
    format!("'{id}' に一致する割り勘が複数あります")
}

#[cfg(not(feature = "ja"))]
pub fn ambiguous_split_id(id: impl fmt::Display) -> String {
    format!("'{id}' matches more than one saved split")
}

#[cfg(feature = "ja")]
pub fn storage_failure(detail: impl fmt::Display) -> String {
    format!("履歴の読み書きに失敗しました: {detail}")
}

#[cfg(not(feature = "ja"))]
pub fn storage_failure(detail: impl fmt::Display) -> String {
    format!("Failed to access split history: {detail}")
}

#[cfg(feature = "ja")]
pub fn reconciliation_failed(difference: impl fmt::Display) -> String {
    format!("検算: 不一致 (差額 {difference})")
}

#[cfg(not(feature = "ja"))]
pub fn reconciliation_failed(difference: impl fmt::Display) -> String {
    format!("Check: off by {difference}")
}

pub struct SyntaxErrorMessage {
    line: usize,
    detail: String,
}

pub struct LineMessage<M> {
    line: usize,
    message: M,
}

pub fn syntax_error(line: usize, detail: String) -> SyntaxErrorMessage {
    SyntaxErrorMessage { line, detail }
}

/// Attaches a script line number to an already localized message.
pub fn at_line<M: fmt::Display>(line: usize, message: M) -> LineMessage<M> {
    LineMessage { line, message }
}

#[cfg(feature = "ja")]
impl fmt::Display for SyntaxErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "構文エラー (行 {}): {}", self.line, self.detail)
    }
}

#[cfg(not(feature = "ja"))]
impl fmt::Display for SyntaxErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error at line {}: {}", self.line, self.detail)
    }
}

#[cfg(feature = "ja")]
impl<M: fmt::Display> fmt::Display for LineMessage<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (行 {})", self.message, self.line)
    }
}

#[cfg(not(feature = "ja"))]
impl<M: fmt::Display> fmt::Display for LineMessage<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}
