//! Entry point for the turntop console. Parses args, resolves the server, and runs the App.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{prelude::*, EnvFilter};

use turntop::app::App;
use turntop::endpoint::{Endpoint, DEFAULT_QUANTUM, DEFAULT_TOP_N};
use turntop::profiles::{
    load_profiles, save_profiles, ProfileEntry, ProfileRequest, ProfilesFile, ResolveProfile,
};
use turntop::ws::DEFAULT_RECONNECT_DELAY;

const USAGE_ARGS: &str = "[--profile NAME|-P NAME] [--save] [--top-n N|-n N] [--quantum Q|-q Q] [--reconnect-ms MS] [--log-file PATH] [--debug] [--dry-run] [http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    profile: Option<String>,
    save: bool,
    top_n: Option<u32>,
    quantum: Option<f64>,
    reconnect_ms: Option<u64>,
    log_file: Option<PathBuf>,
    debug: bool,
    dry_run: bool,
}

enum ArgsError {
    Help(String),
    Invalid(String),
}

fn parse_value<T: std::str::FromStr>(flag: &str, v: Option<String>) -> Result<T, ArgsError> {
    let v = v.ok_or_else(|| ArgsError::Invalid(format!("{flag} requires a value")))?;
    v.parse()
        .map_err(|_| ArgsError::Invalid(format!("invalid value for {flag}: '{v}'")))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgsError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "turntop".into());
    let mut out = ParsedArgs::default();

    while let Some(arg) = it.next() {
        // --flag=value is accepted for every flag that takes a value
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        let value = |it: &mut I::IntoIter| inline.clone().or_else(|| it.next());
        match flag.as_str() {
            "-h" | "--help" => return Err(ArgsError::Help(format!("Usage: {prog} {USAGE_ARGS}"))),
            "--profile" | "-P" => out.profile = value(&mut it).filter(|v| !v.is_empty()),
            "--save" => out.save = true,
            "--debug" => out.debug = true,
            "--dry-run" => out.dry_run = true,
            "--top-n" | "-n" => out.top_n = Some(parse_value(&flag, value(&mut it))?),
            "--quantum" | "-q" => out.quantum = Some(parse_value(&flag, value(&mut it))?),
            "--reconnect-ms" => out.reconnect_ms = Some(parse_value(&flag, value(&mut it))?),
            "--log-file" => out.log_file = value(&mut it).map(PathBuf::from),
            _ if arg.starts_with('-') => {
                return Err(ArgsError::Invalid(format!(
                    "Unknown option '{arg}'. Usage: {prog} {USAGE_ARGS}"
                )))
            }
            _ => {
                if out.url.is_none() {
                    out.url = Some(arg);
                } else {
                    return Err(ArgsError::Invalid(format!(
                        "Unexpected argument. Usage: {prog} {USAGE_ARGS}"
                    )));
                }
            }
        }
    }
    Ok(out)
}

fn init_logging(path: &Path, debug: bool) -> anyhow::Result<()> {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // Append: several consoles may share the default log
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    // Log to a file: stdout belongs to the TUI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgsError::Help(msg)) => {
            println!("{msg}");
            return Ok(());
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let log_path = parsed
        .log_file
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("turntop.log"));
    init_logging(&log_path, parsed.debug)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting turntop");

    let Some(entry) = resolve_entry(&parsed)? else {
        return Ok(());
    };

    let endpoint = match Endpoint::parse(
        &entry.url,
        entry.top_n.unwrap_or(DEFAULT_TOP_N),
        entry.quantum.unwrap_or(DEFAULT_QUANTUM),
    ) {
        Ok(ep) => ep,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    if parsed.dry_run {
        println!("live: {}", endpoint.ws_url());
        println!("actions: {}", endpoint.action_base());
        return Ok(());
    }

    let delay = parsed
        .reconnect_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_RECONNECT_DELAY);
    let mut app = App::new(endpoint, delay);
    app.run().await
}

/// Work out which server to talk to, persisting profiles along the way.
/// `Ok(None)` means the operator aborted or nothing could be resolved.
fn resolve_entry(parsed: &ParsedArgs) -> anyhow::Result<Option<ProfileEntry>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        top_n: parsed.top_n,
        quantum: parsed.quantum,
    };
    let mut profiles_mut = profiles_file.clone();

    let entry = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = parsed.profile.as_ref() {
                let existing = profiles_mut.profiles.get(name).cloned();
                match existing {
                    // New profile: auto-save immediately
                    None => persist(&mut profiles_mut, name, &entry),
                    Some(existing) if existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            persist(&mut profiles_mut, name, &entry);
                        }
                    }
                    Some(_) => {}
                }
            }
            entry
        }
        ResolveProfile::Loaded(entry) => entry,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
                .and_then(|name| profiles_mut.profiles.get(name));
            match picked {
                Some(entry) => ProfileEntry {
                    url: entry.url.clone(),
                    top_n: parsed.top_n.or(entry.top_n),
                    quantum: parsed.quantum.or(entry.quantum),
                },
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter server URL (http://HOST:PORT): ")?;
            if url.trim().is_empty() {
                return Ok(None);
            }
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                top_n: parsed.top_n,
                quantum: parsed.quantum,
            };
            persist(&mut profiles_mut, &name, &entry);
            entry
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(entry))
}

fn persist(profiles: &mut ProfilesFile, name: &str, entry: &ProfileEntry) {
    profiles.profiles.insert(name.to_string(), entry.clone());
    if let Err(e) = save_profiles(profiles) {
        tracing::warn!(profile = name, error = %e, "could not save profiles");
        eprintln!("warning: could not save profile '{name}': {e}");
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
