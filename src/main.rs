use agency_split::{cli, config, export, inspect, reader, scanner, split};
use agency_split_common::AliasConfig;
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use split::{SplitOptions, SplitOutcome};
use std::path::{Path, PathBuf};

/// `--json` 出力用の1ファイル分の結果
#[derive(Serialize)]
struct JsonResult<'a> {
    input: String,
    archive: Option<String>,
    sha256: Option<String>,
    entries: &'a [String],
    summary: agency_split_common::SegmentSummary,
    log: &'a [String],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Split { input, output, layout, alias, max_rows, min_match, log, json } => {
            let mut options = SplitOptions::new(config.layout(layout.as_deref())?);
            options.detection = config.detection;
            if let Some(rows) = max_rows {
                options.detection.max_rows_scanned = rows;
            }
            if let Some(threshold) = min_match {
                options.detection.min_match_threshold = threshold;
            }
            options.aliases = config.aliases.clone();
            if let Some(path) = alias {
                let extra = AliasConfig::from_file(&path)
                    .with_context(|| format!("エイリアスファイルを読み込めません: {}", path.display()))?;
                options.aliases.merge(&extra);
            }

            let inputs = scanner::collect_inputs(&input)?;
            if !json {
                println!("📊 agency-split - {} ({}件)\n", options.layout.title, inputs.len());
            }

            let progress = if inputs.len() > 1 && !json {
                let bar = ProgressBar::new(inputs.len() as u64);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                        .context("進捗表示の設定に失敗しました")?,
                );
                Some(bar)
            } else {
                None
            };

            let mut all_logs = Vec::new();
            let mut json_results = Vec::new();
            let mut failures = 0;

            for workbook in &inputs {
                if let Some(bar) = &progress {
                    bar.set_message(workbook.file_name.clone());
                }
                let bytes = std::fs::read(&workbook.path)
                    .with_context(|| format!("ファイルを読み込めません: {}", workbook.path.display()))?;
                let outcome = split::split_workbook(bytes, &options);

                let stem = (inputs.len() > 1).then(|| workbook.stem());
                let archive_name = export::archive_file_name(
                    &options.layout,
                    stem.as_deref(),
                    chrono::Local::now().naive_local(),
                );
                let target = archive_target(&workbook.path, output.as_deref(), &archive_name);
                let saved = save_outcome(&outcome, &target)?;
                if saved.is_none() {
                    failures += 1;
                }

                if json {
                    json_results.push((workbook.path.display().to_string(), saved, outcome));
                } else {
                    if let Some(bar) = &progress {
                        bar.suspend(|| print_outcome(&outcome, saved.as_ref(), cli.verbose));
                        bar.inc(1);
                    } else {
                        print_outcome(&outcome, saved.as_ref(), cli.verbose);
                    }
                    all_logs.push(outcome.log.to_text());
                }
            }

            if let Some(bar) = &progress {
                bar.finish_and_clear();
            }

            if json {
                let results: Vec<JsonResult> = json_results
                    .iter()
                    .map(|(input, saved, outcome)| JsonResult {
                        input: input.clone(),
                        archive: saved.as_ref().map(|(path, _)| path.display().to_string()),
                        sha256: saved.as_ref().map(|(_, digest)| digest.clone()),
                        entries: &outcome.entries,
                        summary: outcome.summary,
                        log: outcome.log.lines(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
                all_logs.extend(json_results.iter().map(|(_, _, o)| o.log.to_text()));
            }

            if let Some(log_path) = log {
                std::fs::write(&log_path, all_logs.join("\n\n"))
                    .with_context(|| format!("ログを書き込めません: {}", log_path.display()))?;
                if !json {
                    println!("✔ ログを保存: {}", log_path.display());
                }
            }

            if failures > 0 {
                anyhow::bail!("{}件のファイルでZIPを生成できませんでした", failures);
            }
            if !json {
                println!("\n✅ 完了");
            }
        }

        Commands::Inspect { input, layout } => {
            let layout = config.layout(layout.as_deref())?;
            let mut source = reader::XlsxSource::open(&input)
                .with_context(|| format!("ブックを開けません: {}", input.display()))?;
            let report = inspect::inspect(&mut source, &layout, &config.detection);

            println!("🔍 agency-split - 診断 ({})\n", layout.title);
            println!("シート: {}", report.sheets.join(", "));
            for sheet in &report.located {
                match &sheet.sheet {
                    Some(found) => println!("✔ {}: '{}' ({})", sheet.role, found.name, found.rule),
                    None => println!("⚠ {}: 見つかりません", sheet.role),
                }
                if let Some(row) = sheet.header_row {
                    println!("  ヘッダー行: {}", row);
                    println!("  列: {}", sheet.header_values.join(" | "));
                }
            }
            if cli.verbose {
                println!();
                println!("{}", report.log.to_text());
            }
        }

        Commands::Config { show, set_max_rows, set_min_match, set_layout } => {
            let mut config = config;
            let changed = set_max_rows.is_some() || set_min_match.is_some() || set_layout.is_some();

            if let Some(rows) = set_max_rows {
                config.set_max_rows(rows)?;
            }
            if let Some(threshold) = set_min_match {
                config.set_min_match(threshold);
            }
            if let Some(name) = set_layout {
                config.set_default_layout(&name)?;
            }
            if changed {
                config.save().context("設定ファイルの保存に失敗しました")?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  レイアウト: {}", config.default_layout);
                println!("  走査行数: {}", config.detection.max_rows_scanned);
                println!("  最小一致列数: {}", config.detection.min_match_threshold);
                println!("  エイリアス: {}件", config.aliases.agencies.len());
                if let Ok(path) = Config::config_path() {
                    println!("  パス: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// ZIPの保存先（`-o` がなければ入力ファイルと同じフォルダ）
fn archive_target(input: &Path, output: Option<&Path>, archive_name: &str) -> PathBuf {
    match output {
        Some(output) => export::output_path_for_archive(output, archive_name),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(archive_name),
    }
}

/// ZIPを保存し、保存先とSHA-256を返す
fn save_outcome(outcome: &SplitOutcome, target: &Path) -> Result<Option<(PathBuf, String)>> {
    let Some(archive) = &outcome.archive else {
        return Ok(None);
    };
    export::write_archive(target, archive)
        .with_context(|| format!("ZIPを書き込めません: {}", target.display()))?;
    Ok(Some((target.to_path_buf(), export::archive_digest(archive))))
}

fn print_outcome(outcome: &SplitOutcome, saved: Option<&(PathBuf, String)>, verbose: bool) {
    for line in outcome.log.lines() {
        println!("{}", line);
    }
    match saved {
        Some((path, digest)) => {
            println!("✔ ZIP出力: {}", path.display());
            if verbose {
                println!("  SHA-256: {}", digest);
            }
        }
        None => eprintln!("⚠ ZIPは生成されませんでした"),
    }
}
