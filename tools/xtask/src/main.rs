//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 anim-runtime 覆盖率
//! - `choreography-check`: 检查编排文件（JSON 结构、槽位名、时长）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anim_runtime::{Choreography, TransformProperty};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let sh = Shell::new()?;
            eprintln!("\n==> cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;
            eprintln!("\n==> cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;
            eprintln!("\n==> cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        "cov-runtime" => {
            let sh = Shell::new()?;
            if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
                anyhow::bail!(
                    "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
                );
            }
            eprintln!("\n==> cargo llvm-cov -p anim-runtime --html");
            cmd!(sh, "cargo llvm-cov -p anim-runtime --html").run()?;
            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "choreography-check" => {
            let path = args.next();
            choreography_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all            运行 fmt、clippy、test 门禁检查
  cov-runtime          运行 anim-runtime 覆盖率报告
  choreography-check   检查编排文件

CHOREOGRAPHY-CHECK:
  cargo xtask choreography-check [path]

  不带参数：检查 choreographies/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 结构与未知字段
    - 槽位名是否有效
    - 时长与延迟是否为非负有限数
"#
    );
}

//=============================================================================
// choreography-check 命令实现
//=============================================================================

/// 默认编排目录（相对于 workspace root）
const CHOREOGRAPHY_DIR: &str = "choreographies";

/// 执行编排检查
fn choreography_check(path: Option<&str>) -> anyhow::Result<()> {
    let root = PathBuf::from(path.unwrap_or(CHOREOGRAPHY_DIR));
    let files = if root.is_file() {
        vec![root]
    } else if root.is_dir() {
        collect_choreography_files(&root)?
    } else {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定编排路径",
            root.display()
        );
    };

    if files.is_empty() {
        eprintln!("未找到编排文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个编排文件...\n", files.len());

    let mut errors = 0;
    for file in &files {
        match check_file(file) {
            Ok(legs) => eprintln!("[OK] {}: {} 段", file.display(), legs),
            Err(e) => {
                eprintln!("[ERROR] {}: {e:#}", file.display());
                errors += 1;
            }
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    if errors > 0 {
        eprintln!("❌ {} 个错误", errors);
        anyhow::bail!("编排检查发现错误");
    }
    eprintln!("✅ 检查通过，无错误");
    Ok(())
}

/// 收集目录下的所有编排文件
fn collect_choreography_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// 检查单个编排文件，返回段数
fn check_file(file: &Path) -> anyhow::Result<usize> {
    let content = std::fs::read_to_string(file)?;
    let choreography = Choreography::<TransformProperty>::from_json(&content)?;
    Ok(choreography.leg_count())
}
