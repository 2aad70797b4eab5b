//! src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, warn, LevelFilter};

mod cli;
mod config;
mod errors;
mod hook;
mod script;
mod toolchain;

use cli::Cli;
use config::Config;
use hook::{HookKind, InstallRequest, WriteMode};
use script::ScriptOptions;
use toolchain::LinterCommand;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = config::load_config(cli.config.as_deref()).context("无法加载配置。")?;
    let print_only = cli.print;
    let request = build_request(cli, config)?;
    debug!("Install request: {request:?}");

    if !request.script.linter.is_available() {
        warn!(
            "'{}' was not found on PATH; the hook will fail until it is installed",
            request.script.linter.program()
        );
    }

    if print_only {
        let repo = hook::validate_repository(&request.dir)?;
        print!("{}", script::render(&hook::prepare_script(&repo, &request.script)));
        return Ok(());
    }

    let outcome = hook::install(&request)?;

    if let Some(backup) = &outcome.backup_path {
        println!("📦 已备份原有钩子: {}", backup.display());
    }
    let verb = match outcome.mode {
        WriteMode::Truncate => "安装",
        WriteMode::Append => "追加",
    };
    println!(
        "{}",
        format!(
            "✅ {} 钩子{}成功，位置: {}",
            request.hook,
            verb,
            outcome.hook_path.display()
        )
        .green()
    );
    if !request.script.strict {
        println!(
            "{}",
            "提示: 未启用 --strict，lint 失败不会阻止提交。".yellow()
        );
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Merge command-line flags over the config file over built-in defaults.
fn build_request(cli: Cli, config: Config) -> Result<InstallRequest> {
    let hook: HookKind = match cli.hook.or(config.hook) {
        Some(name) => name.parse()?,
        None => HookKind::default(),
    };

    let linter = match cli.linter.or(config.linter) {
        Some(command) => command
            .parse::<LinterCommand>()
            .context("Invalid linter command")?,
        None => LinterCommand::default(),
    };

    Ok(InstallRequest {
        hook,
        backup: cli.backup || config.backup,
        mode: WriteMode::from_append(cli.append || config.append),
        dir: cli.dir,
        script: ScriptOptions {
            strict: cli.strict || config.strict,
            ignore: cli.ignore.unwrap_or(config.ignore),
            linter,
        },
    })
}
