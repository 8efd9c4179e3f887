use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agency-split")]
#[command(about = "統合レポートをエージェンシー別のExcelに分割するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ブックをエージェンシー別に分割してZIPを出力
    Split {
        /// 入力xlsxファイル、またはxlsxを含むフォルダ
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ZIPファイル/フォルダ（デフォルト: 入力と同じフォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レイアウト (corte1/corte2、またはレイアウトJSONのパス)
        #[arg(short, long)]
        layout: Option<String>,

        /// エージェンシー別名ファイル（JSON）
        #[arg(long)]
        alias: Option<PathBuf>,

        /// ヘッダー検出で走査する行数
        #[arg(long)]
        max_rows: Option<usize>,

        /// ヘッダーとみなす最小一致列数
        #[arg(long)]
        min_match: Option<usize>,

        /// 処理ログの保存先
        #[arg(long)]
        log: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// シート特定とヘッダー検出の結果を表示
    Inspect {
        /// 入力xlsxファイル
        #[arg(required = true)]
        input: PathBuf,

        /// レイアウト (corte1/corte2、またはレイアウトJSONのパス)
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// ヘッダー検出の走査行数を設定
        #[arg(long)]
        set_max_rows: Option<usize>,

        /// ヘッダー検出の最小一致列数を設定
        #[arg(long)]
        set_min_match: Option<usize>,

        /// 既定のレイアウトを設定
        #[arg(long)]
        set_layout: Option<String>,
    },
}
