//! 患者プロフィール編集
//!
//! ダイアログを開くたびに1回だけ取得し、フォームへ流し込む。
//! 保存時は新しい画像があれば先にアップロードし、そのURLを
//! `profile_photo` に入れてから PATCH する。成功したら検索キャッシュを捨てる。
//! ダイアログを閉じたらフォーム・プレビュー・取得済み画像をすべて空に戻す。

use crate::api::PatientApi;
use crate::cache::{QueryCache, SEARCH_QUERY_KEY};
use crate::error::{Error, Result};
use crate::lifecycle::{FetchGate, Ticket};
use crate::options::{find_option, GENDER_OPTIONS, PHYSICAL_SHAPE_OPTIONS, PROGNOSIS_OPTIONS};
use crate::types::{DiagnosisOption, PatientProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// フォームの項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Specie,
    Race,
    Owner,
    Gender,
    Weight,
    Prognosis,
    PhysicalShape,
    EntryDate,
    DepartureDate,
}

impl ProfileField {
    pub const ALL: [ProfileField; 10] = [
        ProfileField::Name,
        ProfileField::Specie,
        ProfileField::Race,
        ProfileField::Owner,
        ProfileField::Gender,
        ProfileField::Weight,
        ProfileField::Prognosis,
        ProfileField::PhysicalShape,
        ProfileField::EntryDate,
        ProfileField::DepartureDate,
    ];

    /// APIのフィールド名
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Specie => "specie",
            ProfileField::Race => "race",
            ProfileField::Owner => "owner",
            ProfileField::Gender => "gender",
            ProfileField::Weight => "weight",
            ProfileField::Prognosis => "prognosis",
            ProfileField::PhysicalShape => "physical_shape",
            ProfileField::EntryDate => "entry_date",
            ProfileField::DepartureDate => "departure_date",
        }
    }

    /// 画面のラベル
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "患者名",
            ProfileField::Specie => "種",
            ProfileField::Race => "品種",
            ProfileField::Owner => "飼い主名",
            ProfileField::Gender => "性別",
            ProfileField::Weight => "体重",
            ProfileField::Prognosis => "予後",
            ProfileField::PhysicalShape => "体格",
            ProfileField::EntryDate => "入院日",
            ProfileField::DepartureDate => "退院日",
        }
    }

    /// セレクト入力の選択肢
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            ProfileField::Gender => Some(GENDER_OPTIONS),
            ProfileField::Prognosis => Some(PROGNOSIS_OPTIONS),
            ProfileField::PhysicalShape => Some(PHYSICAL_SHAPE_OPTIONS),
            _ => None,
        }
    }
}

impl std::str::FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        ProfileField::ALL
            .into_iter()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// 項目ごとの入力エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ProfileField,
    pub message: String,
}

/// 入力エラーの一覧
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, field: ProfileField, message: &str) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// 編集フォームの状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub specie: String,
    pub race: String,
    pub owner: String,
    pub gender: Option<String>,
    pub weight: String,
    pub prognosis: Option<String>,
    pub physical_shape: Option<String>,
    pub entry_date: String,
    pub departure_date: String,
    pub undefined_specie: bool,
    pub undefined_race: bool,
    pub ownerless_patient: bool,
    pub diagnosis: Vec<DiagnosisOption>,
}

impl From<&PatientProfile> for ProfileForm {
    fn from(p: &PatientProfile) -> Self {
        Self {
            name: p.name.clone(),
            specie: p.specie.clone(),
            race: p.race.clone(),
            owner: p.owner.clone(),
            gender: p.gender.clone(),
            weight: p.weight.clone(),
            prognosis: p.prognosis.clone(),
            physical_shape: p.physical_shape.clone(),
            entry_date: p.entry_date.clone(),
            departure_date: p.departure_date.clone(),
            undefined_specie: p.undefined_specie,
            undefined_race: p.undefined_race,
            ownerless_patient: p.ownerless_patient,
            diagnosis: p.diagnosis.clone(),
        }
    }
}

impl ProfileForm {
    /// 「不明」チェックで入力を無効にしている項目か
    pub fn is_overridden(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Specie => self.undefined_specie,
            ProfileField::Race => self.undefined_race,
            ProfileField::Owner => self.ownerless_patient,
            _ => false,
        }
    }

    /// 「不明」チェックを切り替える。対象外の項目は何もしない
    pub fn set_overridden(&mut self, field: ProfileField, on: bool) {
        match field {
            ProfileField::Specie => self.undefined_specie = on,
            ProfileField::Race => self.undefined_race = on,
            ProfileField::Owner => self.ownerless_patient = on,
            _ => {}
        }
    }

    /// 項目の現在値（表示用）
    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Specie => &self.specie,
            ProfileField::Race => &self.race,
            ProfileField::Owner => &self.owner,
            ProfileField::Gender => self.gender.as_deref().unwrap_or(""),
            ProfileField::Weight => &self.weight,
            ProfileField::Prognosis => self.prognosis.as_deref().unwrap_or(""),
            ProfileField::PhysicalShape => self.physical_shape.as_deref().unwrap_or(""),
            ProfileField::EntryDate => &self.entry_date,
            ProfileField::DepartureDate => &self.departure_date,
        }
    }

    /// 項目に値を入れる。セレクト項目は選択肢にある値だけ受け付ける（空は未選択）
    pub fn set(&mut self, field: ProfileField, value: &str) -> Result<()> {
        if let Some(options) = field.options() {
            let selected = if value.trim().is_empty() {
                None
            } else {
                let option = find_option(options, value).ok_or_else(|| {
                    let mut errors = ValidationErrors::default();
                    errors.push(
                        field,
                        &format!("{} は選択肢にありません ({})", value, options.join(", ")),
                    );
                    Error::Validation(errors)
                })?;
                Some(option.to_string())
            };
            match field {
                ProfileField::Gender => self.gender = selected,
                ProfileField::Prognosis => self.prognosis = selected,
                _ => self.physical_shape = selected,
            }
            return Ok(());
        }
        let value = value.to_string();
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::Specie => self.specie = value,
            ProfileField::Race => self.race = value,
            ProfileField::Owner => self.owner = value,
            ProfileField::Weight => self.weight = value,
            ProfileField::EntryDate => self.entry_date = value,
            ProfileField::DepartureDate => self.departure_date = value,
            _ => {}
        }
        Ok(())
    }

    /// 必須チェック。「不明」チェック済みの項目は対象外
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errors.push(ProfileField::Name, "患者名を入力してください");
        }
        if !self.undefined_specie && self.specie.trim().is_empty() {
            errors.push(ProfileField::Specie, "種を入力してください");
        }
        if !self.undefined_race && self.race.trim().is_empty() {
            errors.push(ProfileField::Race, "品種を入力してください");
        }
        if !self.ownerless_patient && self.owner.trim().is_empty() {
            errors.push(ProfileField::Owner, "飼い主名を入力してください");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// PATCHの本文（写真は別途マージする）
    pub fn to_patch(&self) -> ProfilePatch {
        ProfilePatch {
            name: self.name.clone(),
            specie: self.specie.clone(),
            race: self.race.clone(),
            owner: self.owner.clone(),
            gender: self.gender.clone(),
            weight: self.weight.clone(),
            prognosis: self.prognosis.clone(),
            physical_shape: self.physical_shape.clone(),
            entry_date: self.entry_date.clone(),
            departure_date: self.departure_date.clone(),
            undefined_specie: self.undefined_specie,
            undefined_race: self.undefined_race,
            ownerless_patient: self.ownerless_patient,
            diagnosis: self.diagnosis.clone(),
            profile_photo: None,
        }
    }
}

/// `PATCH /patient/{id}` の本文
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub name: String,
    pub specie: String,
    pub race: String,
    pub owner: String,
    pub gender: Option<String>,
    pub weight: String,
    pub prognosis: Option<String>,
    pub physical_shape: Option<String>,
    pub entry_date: String,
    pub departure_date: String,
    pub undefined_specie: bool,
    pub undefined_race: bool,
    pub ownerless_patient: bool,
    pub diagnosis: Vec<DiagnosisOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

/// 診断欄で押されたキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisKey {
    Enter,
    Tab,
    Other,
}

impl DiagnosisKey {
    /// `KeyboardEvent.key` の値から
    pub fn from_key(key: &str) -> Self {
        match key {
            "Enter" => DiagnosisKey::Enter,
            "Tab" => DiagnosisKey::Tab,
            _ => DiagnosisKey::Other,
        }
    }
}

/// 保存の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed(String),
}

/// 保存処理に渡す内容
#[derive(Debug, Clone)]
pub struct SubmitJob<I> {
    /// 保存を始めたときの編集セッション
    pub ticket: Ticket,
    pub patient_id: String,
    pub patch: ProfilePatch,
    pub image: Option<I>,
}

/// 編集ダイアログ1回分の状態
#[derive(Debug, Clone)]
pub struct ProfileEditor<I> {
    patient_id: String,
    load: FetchGate<PatientProfile>,
    form: ProfileForm,
    errors: ValidationErrors,
    fetched_image: Option<String>,
    preview_image: Option<String>,
    selected_image: Option<I>,
    diagnosis_input: String,
    submit: SubmitState,
}

impl<I> ProfileEditor<I> {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            load: FetchGate::new(),
            form: ProfileForm::default(),
            errors: ValidationErrors::default(),
            fetched_image: None,
            preview_image: None,
            selected_image: None,
            diagnosis_input: String::new(),
            submit: SubmitState::Idle,
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// 別の患者に切り替える。開いていた取得は捨てる
    pub(crate) fn retarget(&mut self, patient_id: String) {
        self.close();
        self.patient_id = patient_id;
    }

    /// ダイアログを開いた。プロフィールを1回取得する
    pub fn open(&mut self) -> Ticket {
        self.load.open()
    }

    /// 取得結果をフォームへ流し込む
    pub fn apply(&mut self, ticket: Ticket, result: Result<PatientProfile>) -> bool {
        if !self.load.accepts(ticket) {
            return self.load.resolve(ticket, result);
        }
        if let Ok(profile) = &result {
            self.form = ProfileForm::from(profile);
            self.fetched_image = profile.profile_photo.clone();
            self.errors = ValidationErrors::default();
        }
        self.load.resolve(ticket, result)
    }

    /// ダイアログを閉じた。次に開くときは空から始める
    pub fn close(&mut self) {
        self.load.close();
        self.form = ProfileForm::default();
        self.errors = ValidationErrors::default();
        self.fetched_image = None;
        self.preview_image = None;
        self.selected_image = None;
        self.diagnosis_input.clear();
        self.submit = SubmitState::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.load.is_open()
    }

    pub fn is_loading(&self) -> bool {
        self.load.is_loading()
    }

    /// 読み込み中・保存中のオーバーレイを出すか
    pub fn is_busy(&self) -> bool {
        self.is_loading() || self.submit == SubmitState::Saving
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load.error()
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProfileForm {
        &mut self.form
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    /// 表示する写真（選択したプレビューが優先）
    pub fn photo(&self) -> Option<&str> {
        self.preview_image
            .as_deref()
            .or(self.fetched_image.as_deref())
    }

    /// 画像を選んだ。アップロードは保存時まで行わない
    pub fn select_image(&mut self, image: I, preview_url: impl Into<String>) {
        self.selected_image = Some(image);
        self.preview_image = Some(preview_url.into());
    }

    pub fn selected_image(&self) -> Option<&I> {
        self.selected_image.as_ref()
    }

    pub fn diagnosis_input(&self) -> &str {
        &self.diagnosis_input
    }

    pub fn set_diagnosis_input(&mut self, value: impl Into<String>) {
        self.diagnosis_input = value.into();
    }

    /// 診断欄のキー入力。タグを追加したら true（既定動作を止める）
    pub fn handle_diagnosis_key(&mut self, key: DiagnosisKey) -> bool {
        if self.diagnosis_input.is_empty() {
            return false;
        }
        match key {
            DiagnosisKey::Enter | DiagnosisKey::Tab => {
                let label = std::mem::take(&mut self.diagnosis_input);
                self.form.diagnosis.push(DiagnosisOption::new(label));
                true
            }
            DiagnosisKey::Other => false,
        }
    }

    pub fn remove_diagnosis(&mut self, index: usize) {
        if index < self.form.diagnosis.len() {
            self.form.diagnosis.remove(index);
        }
    }

    /// マルチセレクトの変更（× ボタン・全クリア）
    pub fn set_diagnosis(&mut self, diagnosis: Vec<DiagnosisOption>) {
        self.form.diagnosis = diagnosis;
    }

    /// 項目の下に出すエラー（「不明」チェック中の項目は出さない）
    pub fn visible_error(&self, field: ProfileField) -> Option<&str> {
        if self.form.is_overridden(field) {
            return None;
        }
        self.errors.get(field)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// 入力チェックして保存内容を作る
    pub fn begin_submit(&mut self) -> std::result::Result<SubmitJob<I>, ValidationErrors>
    where
        I: Clone,
    {
        if let Err(errors) = self.form.validate() {
            self.errors = errors.clone();
            return Err(errors);
        }
        self.errors = ValidationErrors::default();
        self.submit = SubmitState::Saving;
        Ok(SubmitJob {
            ticket: self.load.current(),
            patient_id: self.patient_id.clone(),
            patch: self.form.to_patch(),
            image: self.selected_image.clone(),
        })
    }

    /// 保存結果を反映する。保存中に閉じた・別の患者へ移った場合は捨てて false
    pub fn finish_submit(&mut self, ticket: Ticket, result: &Result<ProfilePatch>) -> bool {
        if !self.load.is_current(ticket) {
            tracing::debug!(patient_id = %self.patient_id, "discarding stale submit result");
            return false;
        }
        self.submit = match result {
            Ok(patch) => {
                if let Some(url) = &patch.profile_photo {
                    self.fetched_image = Some(url.clone());
                    self.preview_image = None;
                    self.selected_image = None;
                }
                SubmitState::Saved
            }
            Err(e) => SubmitState::Failed(e.banner_message()),
        };
        true
    }
}

impl<I: Clone> ProfileEditor<I> {
    /// 取得して反映する
    pub async fn load<A>(&mut self, api: &A) -> bool
    where
        A: PatientApi<Image = I>,
    {
        let ticket = self.open();
        let result = api.get_profile(&self.patient_id).await;
        self.apply(ticket, result)
    }

    /// 入力チェック → (画像アップロード) → PATCH → 検索キャッシュ破棄
    pub async fn submit<A>(&mut self, api: &A, cache: &QueryCache) -> Result<ProfilePatch>
    where
        A: PatientApi<Image = I>,
    {
        let job = self.begin_submit().map_err(Error::Validation)?;
        let ticket = job.ticket;
        let result = submit_profile(api, cache, job).await;
        self.finish_submit(ticket, &result);
        result
    }
}

/// 保存処理本体。画像アップロードは必ず PATCH より先に終わらせる
pub async fn submit_profile<A: PatientApi>(
    api: &A,
    cache: &QueryCache,
    job: SubmitJob<A::Image>,
) -> Result<ProfilePatch> {
    let SubmitJob {
        patient_id,
        mut patch,
        image,
        ..
    } = job;

    if let Some(image) = image.as_ref() {
        let uploaded = api.upload_image(image).await?;
        tracing::debug!(url = %uploaded.image_url, "profile photo uploaded");
        patch.profile_photo = Some(uploaded.image_url);
    }

    api.patch_profile(&patient_id, &patch).await?;
    cache.invalidate(SEARCH_QUERY_KEY);
    tracing::info!(patient_id = %patient_id, "patient profile updated");
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeApi;
    use futures::executor::block_on;

    fn profile() -> PatientProfile {
        PatientProfile {
            id: "p1".into(),
            name: "Rex".into(),
            specie: "Canino".into(),
            race: "SRD".into(),
            owner: "Ana".into(),
            profile_photo: Some("https://cdn/rex.png".into()),
            diagnosis: vec![DiagnosisOption::new("Otite")],
            ..Default::default()
        }
    }

    fn opened(api: &FakeApi) -> ProfileEditor<String> {
        let mut editor = ProfileEditor::new("p1");
        assert!(block_on(editor.load(api)));
        editor
    }

    #[test]
    fn test_open_populates_form_and_photo() {
        let api = FakeApi::new().with_profile(profile());
        let editor = opened(&api);
        assert_eq!(editor.form().name, "Rex");
        assert_eq!(editor.photo(), Some("https://cdn/rex.png"));
        assert_eq!(api.calls(), vec!["profile:p1".to_string()]);
    }

    #[test]
    fn test_preview_overrides_fetched_photo() {
        let api = FakeApi::new().with_profile(profile());
        let mut editor = opened(&api);
        editor.select_image("new.png".to_string(), "blob:preview-1");
        assert_eq!(editor.photo(), Some("blob:preview-1"));
        // 選んだだけではアップロードしない
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_submit_with_image_uploads_before_patch() {
        let api = FakeApi::new()
            .with_profile(profile())
            .with_upload_url("https://cdn/uploaded.png");
        let cache = QueryCache::new();
        let mut editor = opened(&api);
        editor.select_image("new.png".to_string(), "blob:preview");

        let patch = block_on(editor.submit(&api, &cache)).expect("保存失敗");

        assert_eq!(
            api.calls(),
            vec![
                "profile:p1".to_string(),
                "upload:new.png".to_string(),
                "patch:p1".to_string()
            ]
        );
        assert_eq!(patch.profile_photo.as_deref(), Some("https://cdn/uploaded.png"));
        let sent = api.patches();
        assert_eq!(sent[0].1.profile_photo.as_deref(), Some("https://cdn/uploaded.png"));
        assert_eq!(editor.submit_state(), &SubmitState::Saved);
    }

    #[test]
    fn test_submit_without_image_only_patches() {
        let api = FakeApi::new().with_profile(profile());
        let cache = QueryCache::new();
        let mut editor = opened(&api);
        editor.form_mut().name = "Rex II".into();

        block_on(editor.submit(&api, &cache)).expect("保存失敗");

        assert_eq!(api.calls(), vec!["profile:p1".to_string(), "patch:p1".to_string()]);
        let json = serde_json::to_value(&api.patches()[0].1).expect("シリアライズ失敗");
        assert!(json.get("profile_photo").is_none());
        assert_eq!(json["name"], "Rex II");
    }

    #[test]
    fn test_submit_invalidates_search_cache() {
        let api = FakeApi::new().with_profile(profile());
        let cache = QueryCache::new();
        cache.put(SEARCH_QUERY_KEY, "re", &vec!["stale"]);
        let mut editor = opened(&api);

        block_on(editor.submit(&api, &cache)).expect("保存失敗");

        assert!(cache.is_empty(SEARCH_QUERY_KEY));
        assert_eq!(cache.generation(SEARCH_QUERY_KEY), 1);
    }

    #[test]
    fn test_failed_upload_skips_patch() {
        let api = FakeApi::new().with_profile(profile()).failing_upload();
        let cache = QueryCache::new();
        let mut editor = opened(&api);
        editor.select_image("big.png".to_string(), "blob:x");

        let result = block_on(editor.submit(&api, &cache));

        assert!(result.is_err());
        assert!(!api.calls().iter().any(|c| c.starts_with("patch:")));
        assert_eq!(cache.generation(SEARCH_QUERY_KEY), 0);
        assert!(matches!(editor.submit_state(), SubmitState::Failed(_)));
    }

    #[test]
    fn test_validation_blocks_submission() {
        let api = FakeApi::new().with_profile(profile());
        let cache = QueryCache::new();
        let mut editor = opened(&api);
        editor.form_mut().owner.clear();

        let result = block_on(editor.submit(&api, &cache));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(editor.visible_error(ProfileField::Owner), Some("飼い主名を入力してください"));
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_override_flag_suppresses_error() {
        let mut form = ProfileForm {
            name: "Rex".into(),
            owner: "Ana".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get(ProfileField::Specie).is_some());
        assert!(errors.get(ProfileField::Race).is_some());

        form.undefined_specie = true;
        form.undefined_race = true;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_visible_error_hidden_when_flag_toggled_after_validation() {
        let mut editor: ProfileEditor<String> = ProfileEditor::new("p1");
        editor.form_mut().name = "Rex".into();
        editor.form_mut().specie = "Canino".into();
        editor.form_mut().race = "SRD".into();
        assert!(editor.begin_submit().is_err());
        assert!(editor.visible_error(ProfileField::Owner).is_some());

        editor.form_mut().ownerless_patient = true;
        assert!(editor.visible_error(ProfileField::Owner).is_none());
    }

    #[test]
    fn test_diagnosis_keyboard_entry() {
        let mut editor: ProfileEditor<String> = ProfileEditor::new("p1");
        assert!(!editor.handle_diagnosis_key(DiagnosisKey::Enter));

        editor.set_diagnosis_input("Cinomose");
        assert!(!editor.handle_diagnosis_key(DiagnosisKey::Other));
        assert!(editor.handle_diagnosis_key(DiagnosisKey::Enter));
        editor.set_diagnosis_input("Parvovirose");
        assert!(editor.handle_diagnosis_key(DiagnosisKey::from_key("Tab")));

        assert_eq!(editor.diagnosis_input(), "");
        let labels: Vec<&str> = editor.form().diagnosis.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Cinomose", "Parvovirose"]);

        editor.remove_diagnosis(0);
        assert_eq!(editor.form().diagnosis.len(), 1);
    }

    #[test]
    fn test_close_and_reopen_is_fresh() {
        let api = FakeApi::new().with_profile(profile());
        let mut editor = opened(&api);
        editor.form_mut().name = "rascunho".into();
        editor.select_image("x.png".to_string(), "blob:x");
        editor.set_diagnosis_input("meio digitado");

        editor.close();
        assert_eq!(editor.form(), &ProfileForm::default());
        assert_eq!(editor.photo(), None);
        assert!(editor.selected_image().is_none());

        assert!(block_on(editor.load(&api)));
        assert_eq!(editor.form().name, "Rex");
        assert_eq!(editor.photo(), Some("https://cdn/rex.png"));
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn test_late_profile_after_close_is_ignored() {
        let mut editor: ProfileEditor<String> = ProfileEditor::new("p1");
        let ticket = editor.open();
        editor.close();
        assert!(!editor.apply(ticket, Ok(profile())));
        assert_eq!(editor.form(), &ProfileForm::default());
    }

    fn uploaded(url: &str) -> Result<ProfilePatch> {
        Ok(ProfilePatch {
            profile_photo: Some(url.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_save_finishing_after_patient_switch_is_discarded() {
        let api = FakeApi::new().with_profile(profile());
        let mut editor = opened(&api);
        editor.select_image("rex-new.png".to_string(), "blob:rex");
        let job = editor.begin_submit().expect("入力エラー");

        editor.retarget("p2".into());
        let ticket = editor.open();
        editor.apply(
            ticket,
            Ok(PatientProfile {
                id: "p2".into(),
                name: "Mia".into(),
                profile_photo: Some("https://cdn/mia.png".into()),
                ..Default::default()
            }),
        );

        assert!(!editor.finish_submit(job.ticket, &uploaded("https://cdn/rex-uploaded.png")));
        assert_eq!(editor.photo(), Some("https://cdn/mia.png"));
        assert_eq!(editor.submit_state(), &SubmitState::Idle);
    }

    #[test]
    fn test_save_finishing_after_close_and_reopen_is_discarded() {
        let api = FakeApi::new().with_profile(profile());
        let mut editor = opened(&api);
        let job = editor.begin_submit().expect("入力エラー");

        editor.close();
        assert!(!editor.finish_submit(job.ticket, &uploaded("https://cdn/late.png")));

        assert!(block_on(editor.load(&api)));
        assert!(!editor.finish_submit(job.ticket, &uploaded("https://cdn/late.png")));
        assert_eq!(editor.photo(), Some("https://cdn/rex.png"));
        assert_eq!(editor.submit_state(), &SubmitState::Idle);
    }

    #[test]
    fn test_save_finishing_in_same_session_is_applied() {
        let api = FakeApi::new().with_profile(profile());
        let mut editor = opened(&api);
        editor.select_image("rex-new.png".to_string(), "blob:rex");
        let job = editor.begin_submit().expect("入力エラー");

        assert!(editor.finish_submit(job.ticket, &uploaded("https://cdn/rex-uploaded.png")));
        assert_eq!(editor.photo(), Some("https://cdn/rex-uploaded.png"));
        assert_eq!(editor.submit_state(), &SubmitState::Saved);
        assert!(editor.selected_image().is_none());
    }

    #[test]
    fn test_set_select_field_checks_options() {
        let mut form = ProfileForm::default();
        form.set(ProfileField::Gender, "fêmea").expect("性別");
        assert_eq!(form.gender.as_deref(), Some("Fêmea"));
        match form.set(ProfileField::Prognosis, "Ótimo") {
            Err(Error::Validation(errors)) => {
                assert!(errors.get(ProfileField::Prognosis).is_some_and(|m| m.contains("Ótimo")));
            }
            other => panic!("入力エラーになるはず: {:?}", other),
        }
        form.set(ProfileField::Prognosis, "").expect("未選択");
        assert_eq!(form.prognosis, None);
        form.set(ProfileField::Weight, "12kg").expect("体重");
        assert_eq!(form.value(ProfileField::Weight), "12kg");
    }

    #[test]
    fn test_set_overridden_only_touches_flag_fields() {
        let mut form = ProfileForm::default();
        form.set_overridden(ProfileField::Owner, true);
        form.set_overridden(ProfileField::Weight, true);
        assert!(form.ownerless_patient);
        assert!(form.is_overridden(ProfileField::Owner));
        assert!(!form.is_overridden(ProfileField::Weight));

        form.set_overridden(ProfileField::Owner, false);
        assert!(!form.ownerless_patient);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("physical-shape".parse::<ProfileField>(), Ok(ProfileField::PhysicalShape));
        assert_eq!("Owner".parse::<ProfileField>(), Ok(ProfileField::Owner));
        assert!("photo".parse::<ProfileField>().is_err());
    }
}
