use clap::Parser;
use patient_records::{cli, config, error, gateway, image, prompt, render, session};
use prompt::spinner;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use gateway::HttpGateway;
use patient_records_common::QueryCache;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    init_tracing(cli.verbose, &config.log_filter);

    match cli.command {
        Commands::Search { text, all } => {
            let gateway = connect(&config, cli.api_url.as_deref())?;
            let cache = QueryCache::new();

            let progress = spinner("検索中...");
            let output = session::run_search(&gateway, &cache, &text, all).await;
            progress.finish_and_clear();

            print!("{}", output?);
        }

        Commands::List { page, offset } => {
            let gateway = connect(&config, cli.api_url.as_deref())?;

            let progress = spinner("患者一覧を取得中...");
            let output = session::run_list(&gateway, page, offset).await;
            progress.finish_and_clear();

            print!("{}", output?);
        }

        Commands::Show { id, tab } => {
            let gateway = connect(&config, cli.api_url.as_deref())?;

            let progress = spinner("記録を取得中...");
            let viewer = session::open_viewer(&gateway, &id).await;
            progress.finish_and_clear();

            print!("{}", session::render_viewer(&viewer, tab));
        }

        Commands::Edit(args) => {
            let gateway = connect(&config, cli.api_url.as_deref())?;
            let cache = QueryCache::new();
            let edits = args.to_edits();

            // 送信前に画像を検証しておく
            let selected = args.image.as_deref().map(image::load_image).transpose()?;

            let progress = spinner("プロフィールを取得中...");
            let editor = session::open_editor(&gateway, &args.id).await;
            progress.finish_and_clear();
            let mut editor = editor?;

            session::apply_edits(&mut editor, &edits)?;
            if args.interactive {
                prompt::run_interactive_edit(&mut editor)?;
            }
            if let Some(file) = selected {
                let preview = file.file_name.clone();
                editor.select_image(file, preview);
            }

            if edits.is_empty() && !args.interactive && editor.selected_image().is_none() {
                println!("変更が指定されていません\n");
                print!("{}", render::render_profile(&editor));
                return Ok(());
            }

            let progress = spinner("保存中...");
            let saved = session::save_profile(&gateway, &cache, &mut editor).await;
            progress.finish_and_clear();
            let patch = saved?;

            println!("✔ プロフィールを保存しました: {}", patch.name);
            if let Some(photo) = &patch.profile_photo {
                println!("  写真: {}", photo);
            }
        }

        Commands::Config { set_api_url, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                config.save()?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  APIのURL: {}", config.api_url.as_deref().unwrap_or("未設定"));
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ログ: {}", config.log_filter);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool, default_filter: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn connect(config: &Config, api_url: Option<&str>) -> Result<HttpGateway> {
    let url = config.api_url(api_url)?;
    HttpGateway::new(&url, config.timeout_seconds)
}
