//! `typemagic` command-line entry point.
//!
//! ```text
//! typemagic [--tone preserve|professional|casual] [--bulletize] [--summarize]
//!           [--provider NAME] [--clipboard] [--stats] [TEXT...]
//! ```
//!
//! # Sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] and [`Secrets`] (defaults on first run).
//! 3. Pick the text: arguments, else the clipboard with `--clipboard`, else stdin.
//! 4. Run the correction on a current-thread tokio runtime.
//! 5. Print the result (and copy it back for `--clipboard`), record stats.

use std::io::Read;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use typemagic::{
    clipboard,
    config::{AppConfig, Secrets},
    engine::{CorrectionEngine, CorrectionRequest, CorrectionResult, CorrectionSource},
    prompt::Tone,
    stats::StatsStore,
};

const USAGE: &str = "\
Usage: typemagic [OPTIONS] [TEXT...]

Options:
  --tone <preserve|professional|casual>  Correction tone (default from settings)
  --bulletize                            Rewrite as a bullet list
  --summarize                            Summarize instead of correcting
  --provider <NAME>                      openai, gemini, claude, fastapi or ollama
  --clipboard                            Read from and write back to the clipboard
  --stats                                Print correction counters and exit
  -h, --help                             Show this help

Text is read from the arguments, the clipboard (--clipboard) or stdin.";

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    tone: Option<Tone>,
    bulletize: bool,
    summarize: bool,
    provider: Option<String>,
    clipboard: bool,
    stats: bool,
    help: bool,
    text: Vec<String>,
}

impl CliArgs {
    fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tone" => {
                    let value = args.next().context("--tone needs a value")?;
                    let tone = value.parse::<Tone>().map_err(anyhow::Error::msg)?;
                    parsed.tone = Some(tone);
                }
                "--provider" => {
                    parsed.provider = Some(args.next().context("--provider needs a value")?);
                }
                "--bulletize" => parsed.bulletize = true,
                "--summarize" => parsed.summarize = true,
                "--clipboard" => parsed.clipboard = true,
                "--stats" => parsed.stats = true,
                "-h" | "--help" => parsed.help = true,
                "--" => {
                    parsed.text.extend(args.by_ref());
                }
                flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
                _ => parsed.text.push(arg),
            }
        }
        Ok(parsed)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn read_input(args: &CliArgs) -> Result<(String, CorrectionSource)> {
    if !args.text.is_empty() {
        return Ok((args.text.join(" "), CorrectionSource::ManualEntry));
    }
    if args.clipboard {
        let text = clipboard::read_text()?.unwrap_or_default();
        return Ok((text, CorrectionSource::Clipboard));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok((text, CorrectionSource::ManualEntry))
}

/// One-line outcome logged after a successful correction.
fn outcome_note(result: &CorrectionResult) -> &'static str {
    if result.changed() {
        "Text corrected"
    } else {
        "No changes needed"
    }
}

fn print_stats() -> Result<()> {
    let summary = StatsStore::open().summary_now()?;
    println!("Today:     {}", summary.today);
    println!("This week: {}", summary.weekly);
    println!("Total:     {}", summary.total);
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn run(args: CliArgs) -> Result<bool> {
    if args.stats {
        print_stats()?;
        return Ok(true);
    }

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if let Some(provider) = &args.provider {
        config.provider.provider = provider.clone();
    }
    let secrets = Secrets::load().context("failed to load secrets")?;

    let (text, source) = read_input(&args)?;
    let request = CorrectionRequest {
        tone: args.tone.unwrap_or(config.correction.default_tone),
        bulletize: args.bulletize,
        summarize: args.summarize,
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let engine = CorrectionEngine::from_config(&config);
    let outcome = rt.block_on(engine.correct(&text, &request, source, &config, &secrets));

    match outcome {
        Ok(result) => {
            println!("{}", result.corrected_text);
            log::info!("{}", outcome_note(&result));
            if args.clipboard {
                clipboard::write_text(&result.corrected_text)?;
                log::info!("Corrected text copied to clipboard");
            }
            if let Err(e) = StatsStore::open().record_now() {
                log::warn!("Failed to record stats: {e:#}");
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}", e.message);
            if let Some(source) = &e.source {
                log::debug!("Underlying error: {source}");
            }
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
