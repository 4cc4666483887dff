use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use panning_region::{RegionConfig, Size, Stage, TransitionKind, ViewId};

#[derive(Parser, Debug)]
#[command(name = "panning-region", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a headless slideshow and print the transforms of every swap.
    Simulate(SimulateArgs),
    /// Print the default region config as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Transition kinds to cycle through (repeat the flag for several).
    #[arg(long = "kind", value_enum, default_values_t = [KindChoice::Slide])]
    kinds: Vec<KindChoice>,

    /// Number of swaps after the initial show.
    #[arg(long, default_value_t = 3)]
    steps: u32,

    /// Seed for image and rotation picks.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Region config JSON (defaults apply to missing fields).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never deliver transition-end; rely on `transition_timeout_ms` instead.
    #[arg(long)]
    lose_transition_end: bool,

    /// Emit one JSON object per swap instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindChoice {
    Slide,
    Rotate,
    Drop,
}

impl From<KindChoice> for TransitionKind {
    fn from(k: KindChoice) -> Self {
        match k {
            KindChoice::Slide => TransitionKind::Slide,
            KindChoice::Rotate => TransitionKind::Rotate,
            KindChoice::Drop => TransitionKind::Drop,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct SwapRecord {
    step: u32,
    kind: TransitionKind,
    incoming: ViewId,
    offset: String,
    container: String,
    background: String,
    finalized_by: &'static str,
    after: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&RegionConfig::default())?);
            Ok(())
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<RegionConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let cfg = RegionConfig::from_json_str(&text)
        .with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(cfg)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => RegionConfig::default(),
    };
    let timeout = config.transition_timeout();
    if args.lose_transition_end && timeout.is_none() {
        anyhow::bail!("--lose-transition-end needs transition_timeout_ms in the config");
    }

    let mut stage = Stage::new(Size::new(args.width, args.height), config, args.seed)?;
    let first = stage.show(TransitionKind::Identity)?;
    if !args.json {
        println!("shown {first}");
    }

    for step in 0..args.steps {
        let kind: TransitionKind = args.kinds[step as usize % args.kinds.len()].into();
        let button = panning_region::NEXT_BUTTONS
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(class, _)| *class)
            .context("no button for transition kind")?;
        let incoming = stage
            .click_button(button)?
            .context("current slide ignored the click")?;

        let region = stage.region();
        let scene = stage.scene();
        let incoming_el = region
            .session()
            .map(|s| s.incoming_element())
            .context("swap finished before it could be measured")?;
        let offset = scene.transform(incoming_el)?.to_string();
        let container = scene.computed_transform(region.container())?;
        let background = scene.computed_transform(region.background())?;

        let finalized_by = match timeout {
            Some(t) if args.lose_transition_end => {
                stage.poll_deadline(Instant::now() + t + Duration::from_millis(1))?;
                "timeout"
            }
            _ => {
                stage.transition_end()?;
                "transition_end"
            }
        };
        let after = stage
            .scene()
            .computed_transform(stage.region().container())?;

        let record = SwapRecord {
            step,
            kind,
            incoming,
            offset,
            container,
            background,
            finalized_by,
            after,
        };
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!(
                "#{} {} -> {}: offset {} | container {} | background {} | {} | after {}",
                record.step,
                record.kind,
                record.incoming,
                record.offset,
                record.container,
                record.background,
                record.finalized_by,
                record.after
            );
        }
    }
    Ok(())
}
