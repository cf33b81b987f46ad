//! # Anim Host
//!
//! 无窗口的宿主：按固定帧率驱动若干动画实体，并把槽位值打印到标准输出。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli
//! cargo run -p host-cli -- --piece flip --seconds 2.5 --print-every 5
//! cargo run -p host-cli -- --choreography choreographies/drop.json --log debug
//! ```

mod config;
mod pieces;
mod stage;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{ConfigError, HostConfig, PieceKind};
use crate::pieces::{ChoreographyPiece, Piece};
use crate::stage::Stage;

#[derive(Parser)]
#[command(name = "anim-host")]
#[command(about = "动画宿主 - 逐帧驱动动画实体并输出槽位值")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：config.json，不存在时使用默认配置）
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 启用的内置作品（可重复；覆盖配置文件）
    #[arg(short, long, value_enum)]
    piece: Vec<PieceKind>,

    /// 额外加载的编排文件（可重复；追加到配置文件中的列表）
    #[arg(long)]
    choreography: Vec<PathBuf>,

    /// 帧率
    #[arg(long)]
    fps: Option<u32>,

    /// 模拟时长（秒）
    #[arg(long)]
    seconds: Option<f32>,

    /// 每隔多少帧输出一次
    #[arg(long)]
    print_every: Option<u32>,

    /// 日志级别（trace/debug/info/warn/error）
    #[arg(long)]
    log: Option<String>,

    /// 把合并后的配置写回配置文件
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// 用命令行参数覆盖配置
    fn apply(self, config: &mut HostConfig) {
        if !self.piece.is_empty() {
            config.pieces = self.piece;
        }
        config.choreographies.extend(self.choreography);
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(seconds) = self.seconds {
            config.seconds = seconds;
        }
        if let Some(print_every) = self.print_every {
            config.print_every = print_every;
        }
        if let Some(level) = self.log {
            config.log_level = level;
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("anim-host error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone();
    let save_config = cli.save_config;
    let bootstrap_level = cli
        .log
        .as_deref()
        .and_then(|level| level.parse().ok())
        .unwrap_or(tracing::Level::INFO);
    let mut config = load_config(&config_path, bootstrap_level, std::io::stderr)?;
    cli.apply(&mut config);
    config.validate()?;

    init_logging(&config.log_level)?;
    if save_config {
        config.save(&config_path)?;
        info!(path = %config_path.display(), "配置已保存");
    }
    info!(
        fps = config.fps,
        seconds = config.seconds,
        pieces = config.pieces.len(),
        choreographies = config.choreographies.len(),
        "启动"
    );

    let mut cast: Vec<Box<dyn Piece>> = config.pieces.iter().map(|&k| pieces::build(k)).collect();
    for path in &config.choreographies {
        cast.push(Box::new(ChoreographyPiece::load(path)?));
    }
    let mut stage = Stage::new(cast);
    if stage.is_empty() {
        anyhow::bail!("没有可运行的作品");
    }
    info!(pieces = stage.len(), "舞台就绪");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = stage.run(config.frame_count(), config.frame_dt(), config.print_every, &mut out)?;
    out.flush().context("无法写入标准输出")?;

    info!(frames = report.frames, completed = report.completed, "运行结束");
    for (name, state) in &report.finals {
        info!(piece = %name, ?state, "最终状态");
    }

    Ok(())
}

/// 加载配置文件
///
/// 正式的日志级别要到合并配置后才确定，加载期间先用临时订阅者输出到 `writer`。
fn load_config<W>(path: &Path, level: tracing::Level, writer: W) -> Result<HostConfig, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(bootstrap, || HostConfig::load(path))
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let level: tracing::Level = level
        .parse()
        .with_context(|| format!("无效的日志级别: {level}"))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("日志初始化失败: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// 收集日志输出
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_config_warning_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let captured = Captured::default();
        let sink = captured.clone();

        let config = load_config(
            &dir.path().join("config.json"),
            tracing::Level::INFO,
            move || sink.clone(),
        )
        .unwrap();

        assert_eq!(config, HostConfig::default());
        assert!(captured.text().contains("配置文件不存在"), "{}", captured.text());
    }

    #[test]
    fn test_config_load_respects_bootstrap_level() {
        let dir = tempfile::tempdir().unwrap();
        let captured = Captured::default();
        let sink = captured.clone();

        load_config(
            &dir.path().join("config.json"),
            tracing::Level::ERROR,
            move || sink.clone(),
        )
        .unwrap();

        assert!(captured.text().is_empty());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "anim-host",
            "--piece",
            "ticket",
            "--piece",
            "flip",
            "--fps",
            "30",
            "--choreography",
            "drop.json",
        ]);
        let mut config = HostConfig {
            choreographies: vec![PathBuf::from("nod.json")],
            ..HostConfig::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.pieces, vec![PieceKind::Ticket, PieceKind::Flip]);
        assert_eq!(config.fps, 30);
        assert_eq!(config.seconds, 3.0);
        assert_eq!(
            config.choreographies,
            vec![PathBuf::from("nod.json"), PathBuf::from("drop.json")]
        );
    }

    #[test]
    fn test_cli_defaults_keep_config() {
        let cli = Cli::parse_from(["anim-host"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));

        let mut config = HostConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, HostConfig::default());
    }
}
