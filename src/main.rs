mod core;
mod release;
mod ui;
mod xcode;

use crate::core::context::ProjectContext;
use crate::core::error::{ExitCode, ShipError, ShipResult, print_error};
use crate::release::orchestrator::{self, Mode};
use clap::Parser;
use clap::error::ErrorKind;

/// Package Xcode application builds into versioned release archives
#[derive(Parser)]
#[command(name = "xcship")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct ShipCli {
  /// Development mode: skip the version bump, commit, and tag, and derive
  /// the version from the current revision instead
  #[arg(short = 'n', long = "no-commit")]
  no_commit: bool,

  /// Build configurations to package (default: every configuration in the
  /// project, in discovery order)
  configs: Vec<String>,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  // Unknown flags are usage errors (exit 3), not clap's default exit 2
  let cli = match ShipCli::try_parse() {
    Ok(cli) => cli,
    Err(err) => match err.kind() {
      ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
        let _ = err.print();
        std::process::exit(0);
      }
      _ => {
        let _ = err.print();
        std::process::exit(ExitCode::Usage.as_i32());
      }
    },
  };

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: ShipCli) -> ShipResult<()> {
  let root = std::env::current_dir()?;
  let ctx = ProjectContext::build(&root)?;

  let mode = if cli.no_commit { Mode::Development } else { Mode::Release };
  orchestrator::run(&ctx, mode, &cli.configs)
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
