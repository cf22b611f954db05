use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use suffix_roots_core::config::load_probe_config;
use suffix_roots_core::emit::{Normalization, OutputPaths, write_outputs};
use suffix_roots_core::probe::{ProbeOptions, ProbeProgressCallback, execute_probe};
use suffix_roots_core::psl::{load_psl, select_roots};
use suffix_roots_prober::{ProbeConfig, Prober};
use tracing::debug;

/// Everything one generator run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub psl: PathBuf,
    pub outputs: OutputPaths,
    pub config: Option<PathBuf>,
    pub max_workers: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub limit: Option<usize>,
    pub normalization: Normalization,
    pub show_progress_bar: bool,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub candidates: usize,
    pub probed: usize,
    pub allowlisted: usize,
    pub written: Vec<PathBuf>,
}

/// Expand a leading `~` the way a shell would.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn generate_args_from_matches(matches: &ArgMatches) -> GenerateArgs {
    let path_arg = |name: &str| matches.get_one::<String>(name).map(|p| expand_path(p));

    let normalization = if matches.get_flag("keep-unicode") {
        Normalization::Lowercase
    } else {
        Normalization::IdnaAscii
    };

    GenerateArgs {
        psl: path_arg("psl").unwrap_or_default(),
        outputs: OutputPaths {
            rust_out: path_arg("rust-out"),
            json_out: path_arg("json-out"),
            debug_out: path_arg("debug-out"),
        },
        config: path_arg("config"),
        max_workers: matches.get_one::<usize>("max-workers").copied(),
        timeout_seconds: matches.get_one::<u64>("timeout").copied(),
        limit: matches.get_one::<usize>("limit").copied(),
        normalization,
        show_progress_bar: !matches.get_flag("no-progress") && !matches.get_flag("quiet"),
    }
}

/// Defaults, then the config file, then command-line overrides.
pub fn resolve_probe_config(args: &GenerateArgs) -> Result<ProbeConfig> {
    let mut config = match args.config {
        Some(ref path) => load_probe_config(path)?,
        None => ProbeConfig::default(),
    };

    if let Some(max_workers) = args.max_workers {
        config = config.with_max_workers(max_workers);
    }
    if let Some(timeout_seconds) = args.timeout_seconds {
        config = config.with_timeout_seconds(timeout_seconds);
    }

    config.validate()?;
    Ok(config)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub async fn handle_generate(args: GenerateArgs) -> Result<GenerateSummary> {
    // Fail before touching the network when there is nowhere to write.
    args.outputs.validate()?;

    let config = resolve_probe_config(&args)?;
    debug!("Resolved probe config: {:?}", config);

    let candidates = load_psl(&args.psl)?;
    println!(
        "{} Found {} unique PSL multi-label candidates.",
        "→".blue(),
        candidates.len().to_string().cyan()
    );

    let domains = select_roots(&candidates, args.limit);

    let prober = Prober::new(&config)?;
    let options = ProbeOptions {
        domains,
        max_workers: config.max_workers,
        show_progress_bar: args.show_progress_bar,
    };

    let completed = Arc::new(AtomicUsize::new(0));
    let progress_callback: ProbeProgressCallback = {
        let completed = completed.clone();
        Arc::new(move |done: usize, total: usize| {
            completed.store(done, Ordering::Relaxed);
            debug!("Probed {}/{}", done, total);
        })
    };

    let allowlist = execute_probe(&prober, options, Some(progress_callback)).await?;

    println!();
    println!(
        "{} HTML-like domains found: {}",
        "✓".green().bold(),
        allowlist.len().to_string().bright_white()
    );

    let written = write_outputs(&allowlist, &args.outputs, args.normalization)?;
    for path in &written {
        println!("  {} Wrote {}", "✓".green(), display(path).bright_white());
    }

    Ok(GenerateSummary {
        candidates: candidates.len(),
        probed: completed.load(Ordering::Relaxed),
        allowlisted: allowlist.len(),
        written,
    })
}
