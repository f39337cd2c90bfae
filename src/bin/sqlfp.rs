use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use sqlfp::{DigestAlgorithm, FingerprintConfig, QueryFingerprinter, SqlDialect, SqlfpConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sqlfp")]
#[command(about = "Fingerprint SQL statements by shape")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Digest algorithm (md5, sha256, fx64); overrides the config file
    #[arg(long)]
    digest: Option<String>,

    /// SQL dialect (generic, postgresql, mysql, sqlite, mssql, ansi)
    #[arg(long)]
    dialect: Option<String>,

    /// Print the canonical text instead of the normalized fingerprint
    #[arg(long)]
    canonical: bool,

    /// Statements to fingerprint; read one per line from stdin if absent
    queries: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    let fingerprinter = match QueryFingerprinter::new(config) {
        Ok(fp) => fp,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !cli.queries.is_empty() {
        for sql in &cli.queries {
            if write_line(&mut out, &fingerprinter, sql.as_bytes(), cli.canonical).is_err() {
                break;
            }
        }
        return ExitCode::SUCCESS;
    }

    match fingerprint_lines(io::stdin().lock(), &mut out, &fingerprinter, cli.canonical) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Fingerprints one statement per input line. Blank lines are skipped.
/// A read error stops processing and is returned to the caller.
fn fingerprint_lines(
    input: impl BufRead,
    out: &mut impl Write,
    fingerprinter: &QueryFingerprinter,
    canonical: bool,
) -> io::Result<()> {
    for (line_no, line) in input.split(b'\n').enumerate() {
        let mut raw = line.map_err(|err| {
            io::Error::new(err.kind(), format!("stdin line {}: {err}", line_no + 1))
        })?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        if raw.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        write_line(out, fingerprinter, &raw, canonical)?;
    }
    Ok(())
}

/// Writes `<normalized|canonical|->\t<exact>` for one raw statement.
///
/// Lines that are not valid UTF-8 cannot be parsed, so they only get the
/// exact fingerprint.
fn write_line(
    out: &mut impl Write,
    fingerprinter: &QueryFingerprinter,
    raw: &[u8],
    canonical: bool,
) -> io::Result<()> {
    let normalized = match std::str::from_utf8(raw) {
        Ok(sql) => match fingerprinter.canonicalize(sql) {
            Ok(query) if canonical => query.canonical_text,
            Ok(query) => query.fingerprint.to_hex(),
            Err(_) => "-".to_string(),
        },
        Err(err) => {
            warn!(error = %err, "input is not valid UTF-8, exact fingerprint only");
            "-".to_string()
        }
    };
    let exact = fingerprinter.exact_fingerprint(raw);
    writeln!(out, "{normalized}\t{exact}")
}

fn load_config(cli: &Cli) -> Result<FingerprintConfig, String> {
    let mut config = match &cli.config {
        Some(path) => SqlfpConfig::from_file(path)
            .and_then(|cfg| cfg.to_fingerprint_config())
            .map_err(|err| format!("{}: {err}", path.display()))?,
        None => FingerprintConfig::default(),
    };

    if let Some(name) = &cli.digest {
        config.canonical.digest =
            DigestAlgorithm::from_name(name).ok_or_else(|| format!("unknown digest '{name}'"))?;
    }
    if let Some(name) = &cli.dialect {
        config.parser.dialect =
            SqlDialect::from_name(name).ok_or_else(|| format!("unknown dialect '{name}'"))?;
    }
    Ok(config)
}
