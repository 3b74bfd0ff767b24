use clap::{Args, Parser, Subcommand};
use crate::session::ProfileEdits;
use patient_records_common::{ProfileField, RecordTab};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "patient-records")]
#[command(about = "動物病院の患者記録ブラウザ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 患者名で検索
    Search {
        /// 検索文字列
        #[arg(required = true)]
        text: String,

        /// 件数を絞らずすべて表示
        #[arg(short, long)]
        all: bool,
    },

    /// 患者一覧を1ページ表示
    List {
        /// ページ番号（1始まり）
        #[arg(short, long, conflicts_with = "offset")]
        page: Option<u32>,

        /// オフセット
        #[arg(short, long)]
        offset: Option<u32>,
    },

    /// 患者の記録を表示
    Show {
        /// 患者ID
        #[arg(required = true)]
        id: String,

        /// 表示するタブ (profile/files/exams/hospitalizations/reports)
        #[arg(short, long)]
        tab: Option<RecordTab>,
    },

    /// 患者プロフィールを編集
    Edit(EditArgs),

    /// 設定を表示/編集
    Config {
        /// APIのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// 患者ID
    #[arg(required = true)]
    pub id: String,

    /// 患者名
    #[arg(long)]
    pub name: Option<String>,

    /// 種
    #[arg(long)]
    pub specie: Option<String>,

    /// 品種
    #[arg(long)]
    pub race: Option<String>,

    /// 飼い主名
    #[arg(long)]
    pub owner: Option<String>,

    /// 性別 (Macho/Fêmea)
    #[arg(long)]
    pub gender: Option<String>,

    /// 体重
    #[arg(long)]
    pub weight: Option<String>,

    /// 予後
    #[arg(long)]
    pub prognosis: Option<String>,

    /// 体格
    #[arg(long)]
    pub physical_shape: Option<String>,

    /// 入院日
    #[arg(long)]
    pub entry_date: Option<String>,

    /// 退院日
    #[arg(long)]
    pub departure_date: Option<String>,

    /// 種が不明
    #[arg(long)]
    pub undefined_specie: Option<bool>,

    /// 品種が不明
    #[arg(long)]
    pub undefined_race: Option<bool>,

    /// 飼い主なし
    #[arg(long)]
    pub ownerless: Option<bool>,

    /// 診断を追加（複数指定可）
    #[arg(long)]
    pub diagnosis: Vec<String>,

    /// 既存の診断をすべて外す
    #[arg(long)]
    pub clear_diagnosis: bool,

    /// プロフィール写真 (jpg/jpeg/png)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// 対話的に編集
    #[arg(short, long)]
    pub interactive: bool,
}

impl EditArgs {
    /// フラグを編集内容に変換する
    pub fn to_edits(&self) -> ProfileEdits {
        let fields = [
            (ProfileField::Name, &self.name),
            (ProfileField::Specie, &self.specie),
            (ProfileField::Race, &self.race),
            (ProfileField::Owner, &self.owner),
            (ProfileField::Gender, &self.gender),
            (ProfileField::Weight, &self.weight),
            (ProfileField::Prognosis, &self.prognosis),
            (ProfileField::PhysicalShape, &self.physical_shape),
            (ProfileField::EntryDate, &self.entry_date),
            (ProfileField::DepartureDate, &self.departure_date),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect();

        ProfileEdits {
            fields,
            undefined_specie: self.undefined_specie,
            undefined_race: self.undefined_race,
            ownerless_patient: self.ownerless,
            add_diagnosis: self.diagnosis.clone(),
            clear_diagnosis: self.clear_diagnosis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_flags() {
        let cli = Cli::parse_from([
            "patient-records",
            "edit",
            "p1",
            "--name",
            "Rex",
            "--gender",
            "Macho",
            "--ownerless",
            "true",
            "--diagnosis",
            "Otite",
            "--diagnosis",
            "Sarna",
        ]);
        let Commands::Edit(args) = cli.command else {
            panic!("edit として解釈されない");
        };
        let edits = args.to_edits();
        assert_eq!(
            edits.fields,
            vec![
                (ProfileField::Name, "Rex".to_string()),
                (ProfileField::Gender, "Macho".to_string())
            ]
        );
        assert_eq!(edits.ownerless_patient, Some(true));
        assert_eq!(edits.add_diagnosis, vec!["Otite", "Sarna"]);
    }

    #[test]
    fn test_parse_show_tab() {
        let cli = Cli::parse_from(["patient-records", "show", "p1", "--tab", "exams", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Show { tab: Some(RecordTab::Exams), .. }
        ));
    }

    #[test]
    fn test_page_conflicts_with_offset() {
        let result =
            Cli::try_parse_from(["patient-records", "list", "--page", "2", "--offset", "20"]);
        assert!(result.is_err());
    }
}
