//! 対話式プロフィール編集と通信中のスピナー
//!
//! 項目ごとに現在値を初期値としたプロンプトを出す。
//! セレクト項目は選択肢から選び、「不明」チェックが付いた項目は聞かない。

use crate::error::Result;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use patient_records_common::{ProfileEditor, ProfileField, ProfileForm};

/// 未選択を表す選択肢
const UNSELECTED: &str = "(未選択)";

/// 診断入力の操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisAction {
    /// タグを追加
    Add(String),
    /// 番号のタグを外す
    Remove(usize),
    /// 入力終了
    Done,
}

/// 診断プロンプトの入力を解釈する（`-2` で2番目を外す）
pub fn parse_diagnosis_input(input: &str, count: usize) -> DiagnosisAction {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DiagnosisAction::Done;
    }
    if let Some(index) = trimmed
        .strip_prefix('-')
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=count).contains(n))
    {
        return DiagnosisAction::Remove(index - 1);
    }
    DiagnosisAction::Add(trimmed.to_string())
}

/// 確認を聞くべき項目（「不明」チェック中の項目は除く）
pub fn prompt_fields(form: &ProfileForm) -> Vec<ProfileField> {
    ProfileField::ALL
        .into_iter()
        .filter(|f| !form.is_overridden(*f))
        .collect()
}

pub fn run_interactive_edit<I>(editor: &mut ProfileEditor<I>) -> Result<()> {
    println!("✎ {} を編集します（Enterで現在値のまま）\n", editor.form().name);

    let form = editor.form_mut();
    form.undefined_specie = confirm("種が不明", form.undefined_specie)?;
    form.undefined_race = confirm("品種が不明", form.undefined_race)?;
    form.ownerless_patient = confirm("飼い主なし", form.ownerless_patient)?;

    for field in prompt_fields(editor.form()) {
        let current = editor.form().value(field).to_string();
        let value = match field.options() {
            Some(options) => select_option(field, options, &current)?,
            None => Input::<String>::new()
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?,
        };
        editor.form_mut().set(field, &value)?;
    }

    prompt_diagnosis(editor)?;
    Ok(())
}

fn confirm(prompt: &str, current: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(current)
        .interact()?)
}

fn select_option(field: ProfileField, options: &[&str], current: &str) -> Result<String> {
    let mut items: Vec<&str> = vec![UNSELECTED];
    items.extend_from_slice(options);
    let default = items.iter().position(|o| *o == current).unwrap_or(0);

    let index = Select::new()
        .with_prompt(field.label())
        .items(&items)
        .default(default)
        .interact()?;

    Ok(if index == 0 {
        String::new()
    } else {
        items[index].to_string()
    })
}

fn prompt_diagnosis<I>(editor: &mut ProfileEditor<I>) -> Result<()> {
    loop {
        let tags: Vec<String> = editor
            .form()
            .diagnosis
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}:{}", i + 1, d.label))
            .collect();
        println!("  診断: {}", if tags.is_empty() { "-".to_string() } else { tags.join("  ") });

        let input: String = Input::new()
            .with_prompt("診断を追加 (-番号:削除, Enter:終了)")
            .allow_empty(true)
            .interact_text()?;

        match parse_diagnosis_input(&input, tags.len()) {
            DiagnosisAction::Done => return Ok(()),
            DiagnosisAction::Remove(index) => editor.remove_diagnosis(index),
            DiagnosisAction::Add(label) => {
                editor.set_diagnosis_input(label);
                editor.handle_diagnosis_key(patient_records_common::DiagnosisKey::Enter);
            }
        }
    }
}

/// 通信中に出すスピナー
pub fn spinner(message: &str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(message.to_string());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
