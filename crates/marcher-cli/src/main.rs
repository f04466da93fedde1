use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marcher_core::types::vectors::{Color, V3d};
use marcher_core::{EvalFrame, Runtime, RuntimeConfig, RuntimeError, Signal};

#[derive(Parser)]
#[command(name = "marcher")]
#[command(about = "Inspect and call the marcher scene builtins.", long_about = None)]
struct Cli {
    /// Log registrations and dispatches (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Factor applied to shape envelopes.
    #[arg(long, global = true, value_name = "FACTOR")]
    envelope_margin: Option<f64>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print every builtin signature in registration order.
    List,
    /// Print every registered type with its key and slot count.
    Types,
    /// Dispatch one builtin with literal arguments.
    ///
    /// Literals: numbers, `true`/`false`, `v3d:x,y,z`, `color:r,g,b`; anything else is a string.
    Call {
        name: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            let fatal = err.downcast_ref::<RuntimeError>().is_none_or(RuntimeError::is_fatal);
            std::process::ExitCode::from(if fatal { 2 } else { 1 })
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "marcher_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = RuntimeConfig::new();
    if let Some(margin) = cli.envelope_margin {
        config = config.with_envelope_margin(margin);
    }
    let mut rt = Runtime::new(config);
    rt.signal(Signal::Init1).context("runtime initialization failed")?;
    tracing::debug!(types = rt.types().len(), margin = rt.config().envelope_margin, "runtime ready");

    match cli.cmd {
        Cmd::List => {
            for b in rt.builtins() {
                println!("{}", b.signature);
            }
        }
        Cmd::Types => {
            for t in rt.types().iter() {
                let shape = if t.layout.is_flat() { format!("{} slots", t.layout.slots()) } else { "opaque".into() };
                println!("{:<12} {}  {}", t.name, t.key, shape);
            }
        }
        Cmd::Call { name, args } => {
            let mut frame = EvalFrame::new();
            for a in &args {
                push_literal(&mut frame, a)?;
            }
            let arguments = frame.arguments();
            let out = rt.dispatch(&name, &frame, &arguments).map_err(|e| {
                let code = e.code().as_str();
                anyhow::Error::new(e).context(format!("error[{code}] in `{name}`"))
            })?;
            println!("{out}");
        }
    }
    Ok(())
}

fn push_literal(frame: &mut EvalFrame, text: &str) -> Result<()> {
    if let Ok(n) = text.parse::<f64>() {
        frame.push_value(n);
    } else if let Ok(b) = text.parse::<bool>() {
        frame.push_value(b);
    } else if let Some(rest) = text.strip_prefix("v3d:") {
        let [x, y, z] = triple(rest)?;
        frame.push_value(V3d::new(x, y, z));
    } else if let Some(rest) = text.strip_prefix("color:") {
        let [r, g, b] = triple(rest)?;
        frame.push_value(Color::new(r, g, b));
    } else {
        frame.push_value(text.to_string());
    }
    Ok(())
}

fn triple(text: &str) -> Result<[f64; 3]> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<f64>().with_context(|| format!("bad component `{p}`")))
        .collect::<Result<Vec<_>>>()?;
    match parts.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => bail!("expected three comma-separated components, got {}", parts.len()),
    }
}
