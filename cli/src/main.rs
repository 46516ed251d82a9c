use std::path::PathBuf;
use std::process;

use clap::Parser;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use embellish::pipeline::base_dir;
use embellish::{EmbellishError, Settings, Source};

#[derive(Parser)]
#[command(
    name = "embellish",
    version,
    about = "Insert license text and status badges into a project README"
)]
struct Cli {
    /// Markdown file to embellish; package.json is read from its directory
    #[arg(default_value = "README.md")]
    file: PathBuf,

    /// Overwrite the file in place instead of printing to stdout
    #[arg(short, long)]
    write: bool,

    /// Exit with status 1 if the file or LICENSE is not already embellished; nothing is written
    #[arg(long, conflicts_with = "write")]
    check: bool,

    /// Skip network lookups for badges
    #[arg(long)]
    offline: bool,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,

    /// More log output on stderr (-v, -vv). EMBELLISH_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let code = run(&cli).await.unwrap_or_else(|error| {
        emit_error(&error, color_choice);
        1
    });
    process::exit(code);
}

async fn run(cli: &Cli) -> Result<i32, EmbellishError> {
    let settings = Settings::load(&base_dir(&cli.file)).await?.offline(cli.offline);
    debug!(file = %cli.file.display(), ?settings, "embellishing");
    let source = Source::File(cli.file.clone());

    if cli.check {
        let result = embellish::render(source, Some(settings)).await?;
        let stale = result.stale_files(&cli.file).await?;
        if stale.is_empty() {
            eprintln!("ok: {} is up to date", cli.file.display());
            return Ok(0);
        }
        for path in &stale {
            eprintln!("{}: not embellished", path.display());
        }
        return Ok(1);
    }

    let result = embellish::embellish(source, Some(settings)).await?;
    if cli.write {
        tokio::fs::write(&cli.file, &result.markdown)
            .await
            .map_err(|e| EmbellishError::io(&cli.file, e))?;
        eprintln!("updated {}", cli.file.display());
    } else {
        print!("{}", result.markdown);
    }

    if let Some(path) = &result.license_file {
        eprintln!("wrote {}", path.display());
    }
    Ok(0)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("EMBELLISH_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn emit_error(error: &EmbellishError, color_choice: ColorChoice) {
    match error {
        EmbellishError::Manifest(manifest) => {
            let mut files = SimpleFiles::new();
            let file_id = files.add(
                manifest.path.display().to_string(),
                manifest.source_text.clone(),
            );
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            let diagnostic = manifest.to_diagnostic(file_id);
            if term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic).is_err() {
                eprintln!("error: {}", error);
            }
        }
        other => eprintln!("error: {}", other),
    }
}
