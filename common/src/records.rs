//! 患者記録ビューア
//!
//! タブは5つ（プロフィール・添付ファイル・検査・入院・経過報告）。
//! ダイアログを開いた時点で全タブを並行して取得し、タブを切り替えても
//! 取得済みデータは捨てない。閉じると全タブのゲートを閉じ、次回は最初から取り直す。

use crate::api::PatientApi;
use crate::error::Result;
use crate::lifecycle::{FetchGate, Ticket};
use crate::profile::ProfileEditor;
use crate::types::{Attachment, Exam, Hospitalization, PatientProfile, Report};

/// ビューアのタブ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecordTab {
    #[default]
    Profile,
    Attachments,
    Exams,
    Hospitalizations,
    Reports,
}

impl RecordTab {
    pub const ALL: [RecordTab; 5] = [
        RecordTab::Profile,
        RecordTab::Attachments,
        RecordTab::Exams,
        RecordTab::Hospitalizations,
        RecordTab::Reports,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RecordTab::Profile => "プロフィール",
            RecordTab::Attachments => "添付ファイル",
            RecordTab::Exams => "検査",
            RecordTab::Hospitalizations => "入院",
            RecordTab::Reports => "経過報告",
        }
    }

    /// 空のときに出す登録ボタンの文言（プロフィールには無い）
    pub fn register_label(&self) -> Option<&'static str> {
        match self {
            RecordTab::Profile => None,
            RecordTab::Attachments => Some("ファイルを登録"),
            RecordTab::Exams => Some("検査を登録"),
            RecordTab::Hospitalizations => Some("入院を登録"),
            RecordTab::Reports => Some("経過報告を登録"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTab::Profile => "profile",
            RecordTab::Attachments => "files",
            RecordTab::Exams => "exams",
            RecordTab::Hospitalizations => "hospitalizations",
            RecordTab::Reports => "reports",
        }
    }
}

impl std::str::FromStr for RecordTab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "profile" => Ok(RecordTab::Profile),
            "files" | "attachments" => Ok(RecordTab::Attachments),
            "exams" => Ok(RecordTab::Exams),
            "hospitalizations" => Ok(RecordTab::Hospitalizations),
            "reports" => Ok(RecordTab::Reports),
            _ => Err(format!("Unknown tab: {}", s)),
        }
    }
}

/// 開いたときに発行した5本の取得
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTickets {
    pub profile: Ticket,
    pub files: Ticket,
    pub exams: Ticket,
    pub hospitalizations: Ticket,
    pub reports: Ticket,
}

/// タブ1つ分の表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabView {
    Closed,
    Loading,
    /// 一覧が空（登録ボタンを出す）
    Empty,
    Items(usize),
    Failed,
}

#[derive(Debug, Clone)]
pub struct RecordViewer<I> {
    patient_id: String,
    active: RecordTab,
    editor: ProfileEditor<I>,
    files: FetchGate<Vec<Attachment>>,
    exams: FetchGate<Vec<Exam>>,
    hospitalizations: FetchGate<Vec<Hospitalization>>,
    reports: FetchGate<Vec<Report>>,
}

impl<I> RecordViewer<I> {
    pub fn new(patient_id: impl Into<String>) -> Self {
        let patient_id = patient_id.into();
        Self {
            editor: ProfileEditor::new(patient_id.clone()),
            patient_id,
            active: RecordTab::default(),
            files: FetchGate::new(),
            exams: FetchGate::new(),
            hospitalizations: FetchGate::new(),
            reports: FetchGate::new(),
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// 開く。全タブの取得を一度に発行する
    pub fn open(&mut self) -> RecordTickets {
        tracing::debug!(patient_id = %self.patient_id, "opening record viewer");
        RecordTickets {
            profile: self.editor.open(),
            files: self.files.open(),
            exams: self.exams.open(),
            hospitalizations: self.hospitalizations.open(),
            reports: self.reports.open(),
        }
    }

    /// 別の患者で開き直す。前の患者の遅れたレスポンスは受け付けない
    pub fn open_patient(&mut self, patient_id: impl Into<String>) -> RecordTickets {
        let patient_id = patient_id.into();
        self.close();
        self.editor.retarget(patient_id.clone());
        self.patient_id = patient_id;
        self.open()
    }

    /// 閉じる。選択中のタブは次回に持ち越す
    pub fn close(&mut self) {
        self.editor.close();
        self.files.close();
        self.exams.close();
        self.hospitalizations.close();
        self.reports.close();
    }

    pub fn is_open(&self) -> bool {
        self.editor.is_open()
    }

    pub fn active_tab(&self) -> RecordTab {
        self.active
    }

    pub fn select_tab(&mut self, tab: RecordTab) {
        self.active = tab;
    }

    pub fn editor(&self) -> &ProfileEditor<I> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ProfileEditor<I> {
        &mut self.editor
    }

    pub fn resolve_profile(&mut self, ticket: Ticket, result: Result<PatientProfile>) -> bool {
        self.editor.apply(ticket, result)
    }

    pub fn resolve_files(&mut self, ticket: Ticket, result: Result<Vec<Attachment>>) -> bool {
        self.files.resolve(ticket, result)
    }

    pub fn resolve_exams(&mut self, ticket: Ticket, result: Result<Vec<Exam>>) -> bool {
        self.exams.resolve(ticket, result)
    }

    pub fn resolve_hospitalizations(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Hospitalization>>,
    ) -> bool {
        self.hospitalizations.resolve(ticket, result)
    }

    pub fn resolve_reports(&mut self, ticket: Ticket, result: Result<Vec<Report>>) -> bool {
        self.reports.resolve(ticket, result)
    }

    pub fn files(&self) -> &[Attachment] {
        self.files.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn exams(&self) -> &[Exam] {
        self.exams.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn hospitalizations(&self) -> &[Hospitalization] {
        self.hospitalizations.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reports(&self) -> &[Report] {
        self.reports.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// タブの読み込み中オーバーレイを出すか
    pub fn is_tab_loading(&self, tab: RecordTab) -> bool {
        match tab {
            RecordTab::Profile => self.editor.is_busy(),
            RecordTab::Attachments => self.files.is_loading(),
            RecordTab::Exams => self.exams.is_loading(),
            RecordTab::Hospitalizations => self.hospitalizations.is_loading(),
            RecordTab::Reports => self.reports.is_loading(),
        }
    }

    pub fn tab_error(&self, tab: RecordTab) -> Option<&str> {
        match tab {
            RecordTab::Profile => self.editor.load_error(),
            RecordTab::Attachments => self.files.error(),
            RecordTab::Exams => self.exams.error(),
            RecordTab::Hospitalizations => self.hospitalizations.error(),
            RecordTab::Reports => self.reports.error(),
        }
    }

    /// 一覧タブの表示状態
    pub fn tab_view(&self, tab: RecordTab) -> TabView {
        if !self.is_open() {
            return TabView::Closed;
        }
        if self.is_tab_loading(tab) {
            return TabView::Loading;
        }
        let count = match tab {
            RecordTab::Profile if self.editor.load_error().is_some() => return TabView::Failed,
            RecordTab::Profile => return TabView::Items(1),
            RecordTab::Attachments => self.files().len(),
            RecordTab::Exams => self.exams().len(),
            RecordTab::Hospitalizations => self.hospitalizations().len(),
            RecordTab::Reports => self.reports().len(),
        };
        match (count, self.tab_error(tab)) {
            (0, Some(_)) => TabView::Failed,
            (0, None) => TabView::Empty,
            (n, _) => TabView::Items(n),
        }
    }
}

impl<I: Clone> RecordViewer<I> {
    /// 開いて全タブを並行取得する。すべて反映できたら true
    pub async fn load_all<A>(&mut self, api: &A) -> bool
    where
        A: PatientApi<Image = I>,
    {
        let tickets = self.open();
        let id = self.patient_id.clone();
        let (profile, files, exams, hospitalizations, reports) = futures::join!(
            api.get_profile(&id),
            api.list_files(&id),
            api.list_exams(&id),
            api.list_hospitalizations(&id),
            api.list_reports(&id)
        );
        // 1つでも捨てられたら false（短絡させずに全部反映する）
        let results = [
            self.resolve_profile(tickets.profile, profile),
            self.resolve_files(tickets.files, files),
            self.resolve_exams(tickets.exams, exams),
            self.resolve_hospitalizations(tickets.hospitalizations, hospitalizations),
            self.resolve_reports(tickets.reports, reports),
        ];
        results.iter().all(|accepted| *accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fake::FakeApi;
    use crate::profile::{ProfilePatch, SubmitState};
    use futures::executor::block_on;

    fn api() -> FakeApi {
        FakeApi::new()
            .with_profile(PatientProfile {
                id: "p1".into(),
                name: "Mia".into(),
                ..Default::default()
            })
            .with_files(vec![Attachment {
                id: "f1".into(),
                filename: "raio-x.pdf".into(),
                file_url: "https://cdn/raio-x.pdf".into(),
                ..Default::default()
            }])
            .with_exams(vec![Exam::default(), Exam::default()])
    }

    #[test]
    fn test_open_fetches_every_tab_once() {
        let api = api();
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");

        assert!(block_on(viewer.load_all(&api)));

        let mut calls = api.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec!["exams:p1", "files:p1", "profile:p1", "reports:p1"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(viewer.editor().form().name, "Mia");
        assert_eq!(viewer.tab_view(RecordTab::Attachments), TabView::Items(1));
        assert_eq!(viewer.tab_view(RecordTab::Exams), TabView::Items(2));
        assert_eq!(viewer.tab_view(RecordTab::Reports), TabView::Empty);
        assert_eq!(viewer.tab_view(RecordTab::Hospitalizations), TabView::Empty);
    }

    #[test]
    fn test_switching_tabs_keeps_data() {
        let api = api();
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        block_on(viewer.load_all(&api));

        viewer.select_tab(RecordTab::Exams);
        viewer.select_tab(RecordTab::Attachments);
        assert_eq!(viewer.files().len(), 1);
        assert_eq!(viewer.exams().len(), 2);
        assert_eq!(api.calls().len(), 4);
    }

    #[test]
    fn test_each_tab_loads_independently() {
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        let tickets = viewer.open();
        assert!(RecordTab::ALL.iter().all(|t| viewer.is_tab_loading(*t)));

        viewer.resolve_files(tickets.files, Ok(Vec::new()));
        assert!(!viewer.is_tab_loading(RecordTab::Attachments));
        assert!(viewer.is_tab_loading(RecordTab::Exams));
        assert_eq!(viewer.tab_view(RecordTab::Attachments), TabView::Empty);
    }

    #[test]
    fn test_close_discards_late_responses_and_reopen_is_cold() {
        let api = api();
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        let tickets = viewer.open();
        viewer.close();

        assert!(!viewer.resolve_exams(tickets.exams, Ok(vec![Exam::default()])));
        assert!(viewer.exams().is_empty());
        assert_eq!(viewer.tab_view(RecordTab::Exams), TabView::Closed);

        assert!(block_on(viewer.load_all(&api)));
        assert_eq!(viewer.exams().len(), 2);
    }

    #[test]
    fn test_open_patient_drops_previous_patient_responses() {
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        let old = viewer.open();
        viewer.select_tab(RecordTab::Exams);

        let new = viewer.open_patient("p2");
        assert_eq!(viewer.patient_id(), "p2");
        assert_eq!(viewer.editor().patient_id(), "p2");
        assert_eq!(viewer.active_tab(), RecordTab::Exams);

        assert!(!viewer.resolve_exams(old.exams, Ok(vec![Exam::default()])));
        assert!(viewer.resolve_exams(new.exams, Ok(Vec::new())));
        assert_eq!(viewer.tab_view(RecordTab::Exams), TabView::Empty);
    }

    #[test]
    fn test_save_for_previous_patient_does_not_touch_next_patient() {
        let api = api();
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        block_on(viewer.load_all(&api));
        let form = viewer.editor_mut().form_mut();
        form.specie = "Canino".into();
        form.race = "SRD".into();
        form.owner = "Ana".into();
        viewer.editor_mut().select_image("rex.png".to_string(), "blob:rex");
        let job = viewer.editor_mut().begin_submit().expect("入力エラー");

        let tickets = viewer.open_patient("p2");
        viewer.resolve_profile(
            tickets.profile,
            Ok(PatientProfile {
                id: "p2".into(),
                name: "Mia".into(),
                profile_photo: Some("https://cdn/mia.png".into()),
                ..Default::default()
            }),
        );

        let late = Ok(ProfilePatch {
            profile_photo: Some("https://cdn/rex-uploaded.png".into()),
            ..Default::default()
        });
        assert!(!viewer.editor_mut().finish_submit(job.ticket, &late));
        assert_eq!(viewer.editor().photo(), Some("https://cdn/mia.png"));
        assert_eq!(viewer.editor().submit_state(), &SubmitState::Idle);
    }

    #[test]
    fn test_active_tab_survives_close() {
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        viewer.open();
        viewer.select_tab(RecordTab::Reports);
        viewer.close();
        assert_eq!(viewer.active_tab(), RecordTab::Reports);
    }

    #[test]
    fn test_failed_tab_is_reported() {
        let mut viewer: RecordViewer<String> = RecordViewer::new("p1");
        let tickets = viewer.open();
        viewer.resolve_reports(tickets.reports, Err(Error::Network("down".into())));
        assert_eq!(viewer.tab_view(RecordTab::Reports), TabView::Failed);
        assert!(viewer.tab_error(RecordTab::Reports).is_some());
    }

    #[test]
    fn test_tab_from_str() {
        assert_eq!("files".parse::<RecordTab>(), Ok(RecordTab::Attachments));
        assert_eq!("Exams".parse::<RecordTab>(), Ok(RecordTab::Exams));
        assert!("xray".parse::<RecordTab>().is_err());
        assert_eq!(RecordTab::Profile.register_label(), None);
    }
}
