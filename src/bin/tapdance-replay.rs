// Tapdance Replay CLI
// Feeds a timestamped key script through the gesture engine and prints the output stream

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use tapdance_core::{
    default_config_content, Config, EventOutcome, GestureEngine, Key, KeyEvent, Millis, OutputRecorder,
};

/// Replay key scripts through the tap-dance engine
#[derive(Parser, Debug)]
#[command(name = "tapdance-replay")]
#[command(version)]
#[command(about = "Replay key scripts through the tap-dance engine", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to ~/.config/tapdance/config.toml, then the preset)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// Print the built-in config and exit
    #[arg(long)]
    print_default_config: bool,

    /// Script to replay (stdin if omitted)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

/// One parsed script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Event(KeyEvent),
    /// Idle poll at the given time
    Tick(Millis),
}

impl Command {
    fn at(&self) -> Millis {
        match self {
            Command::Event(ev) => ev.timestamp,
            Command::Tick(at) => *at,
        }
    }
}

/// Parse one line: `<ms> press|release <KEY> [layer=<n>] [hold]` or `<ms> tick`.
///
/// Blank lines and `#` comments yield `None`.
fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let at: Millis = parts
        .next()
        .ok_or_else(|| anyhow!("missing timestamp"))?
        .parse()
        .context("timestamp must be milliseconds")?;
    let verb = parts.next().ok_or_else(|| anyhow!("missing command"))?;

    if verb.eq_ignore_ascii_case("tick") {
        if let Some(extra) = parts.next() {
            bail!("unexpected '{}' after tick", extra);
        }
        return Ok(Some(Command::Tick(at)));
    }

    let key_name = parts.next().ok_or_else(|| anyhow!("missing key after '{}'", verb))?;
    let key: Key = key_name.parse().map_err(|_| anyhow!("unknown key '{}'", key_name))?;
    let mut event = match verb.to_ascii_lowercase().as_str() {
        "press" => KeyEvent::press(key, at),
        "release" => KeyEvent::release(key, at),
        other => bail!("unknown command '{}'", other),
    };

    for flag in parts {
        if let Some(layer) = flag.strip_prefix("layer=") {
            event = event.on_layer(layer.parse().with_context(|| format!("bad layer '{}'", layer))?);
        } else if flag.eq_ignore_ascii_case("hold") {
            event = event.as_hold();
        } else {
            bail!("unknown flag '{}'", flag);
        }
    }
    Ok(Some(Command::Event(event)))
}

fn parse_script(text: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    let mut last = 0;
    for (idx, line) in text.lines().enumerate() {
        let Some(command) = parse_line(line).with_context(|| format!("line {}: '{}'", idx + 1, line.trim()))?
        else {
            continue;
        };
        if command.at() < last {
            bail!("line {}: timestamp {} goes backwards (previous {})", idx + 1, command.at(), last);
        }
        last = command.at();
        commands.push(command);
    }
    Ok(commands)
}

/// Run the script, writing one line per output edge or passthrough event
fn replay<W: Write>(engine: &mut GestureEngine, commands: &[Command], out: &mut W) -> Result<()> {
    let mut recorder = OutputRecorder::new();

    for command in commands {
        let at = command.at();
        advance(engine, &mut recorder, at, out)?;
        match command {
            Command::Event(event) => {
                let outcome = engine.process_event(event, &mut recorder);
                write_edges(&mut recorder, at, out)?;
                if outcome == EventOutcome::Passthrough {
                    writeln!(out, "{:>6} pass {} {}", at, event.action, event.key)?;
                }
            }
            Command::Tick(now) => {
                engine.tick(*now, &mut recorder);
                write_edges(&mut recorder, at, out)?;
            }
        }
    }

    // Close whatever window the script left open
    if let Some(deadline) = engine.next_deadline() {
        let end = deadline + 1;
        engine.tick(end, &mut recorder);
        write_edges(&mut recorder, end, out)?;
    }

    if recorder.held_count() > 0 {
        log::warn!("script ended with {} output key(s) held", recorder.held_count());
    }
    Ok(())
}

/// Fire every window that closed before `at`, stamping edges with the instant it closed
fn advance<W: Write>(
    engine: &mut GestureEngine,
    recorder: &mut OutputRecorder,
    at: Millis,
    out: &mut W,
) -> Result<()> {
    while let Some(deadline) = engine.next_deadline() {
        let fired = deadline + 1;
        if fired > at {
            break;
        }
        engine.tick(fired, recorder);
        write_edges(recorder, fired, out)?;
    }
    Ok(())
}

fn write_edges<W: Write>(recorder: &mut OutputRecorder, at: Millis, out: &mut W) -> Result<()> {
    for edge in recorder.take_events() {
        writeln!(out, "{:>6} {}", at, edge)?;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => {
            Config::from_toml_path(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => Config::load_default().context("failed to load default config"),
    }
}

fn read_script(args: &Args) -> Result<String> {
    match &args.script {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.print_default_config {
        print!("{}", default_config_content());
        return Ok(());
    }

    let config = load_config(&args)?;
    let engine_config = config.to_engine_config();

    if args.check_config {
        println!(
            "Configuration is valid: {} dance key(s), {} hold intercept(s)",
            engine_config.dances.len(),
            engine_config.intercepts.len()
        );
        return Ok(());
    }

    let commands = parse_script(&read_script(&args)?)?;
    let mut engine = GestureEngine::new(engine_config);
    let stdout = io::stdout();
    replay(&mut engine, &commands, &mut stdout.lock())
}
