//! 確認・入力ダイアログ
//!
//! セッションはモーダルな対話に直接依存せず、この trait 越しに問い合わせる。

use crate::error::Result;
use dialoguer::{Confirm, Input};

pub trait Prompter {
    /// はい/いいえ の確認
    fn confirm(&self, message: &str) -> Result<bool>;

    /// 1行入力（空入力・キャンセルは None）
    fn input(&self, message: &str) -> Result<Option<String>>;
}

/// 端末での対話
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()?;
        Ok(answer)
    }

    fn input(&self, message: &str) -> Result<Option<String>> {
        let input: String = Input::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();
        Ok((!input.is_empty()).then(|| input.to_string()))
    }
}

/// 確認は常に「はい」、入力は常に空（`--yes` 用）
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(true)
    }

    fn input(&self, _message: &str) -> Result<Option<String>> {
        Ok(None)
    }
}
