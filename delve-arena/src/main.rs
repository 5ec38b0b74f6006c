use anyhow::Result;
use clap::Parser;
use delve_arena::{Arena, ArenaConfig};
use delve_async_trainer::{
    AgentConfig, CoordinatorStat, Scenario, ScenarioConfig, ScenarioStat, ScenarioType,
};
use delve_candle_model::{NavigatorConfig, NavigatorModel};
use delve_core::{
    record::{LogRecorder, NullRecorder, Recorder},
    ModelArchitecture,
};
use log::info;
use std::{path::PathBuf, sync::Arc};

const MODEL_DIR: &str = "./model/delve-arena";

/// Run agents in a headless arena, training the shared model on the fly
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scenario configuration (YAML). Defaults fit the arena layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena configuration (YAML)
    #[arg(long)]
    arena: Option<PathBuf>,

    /// Where the model is loaded from and saved to
    #[arg(long, default_value = MODEL_DIR)]
    model_dir: String,

    /// Number of ticks
    #[arg(long, default_value_t = 20000)]
    ticks: usize,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Overrides the number of agents
    #[arg(short, long)]
    num_agents: Option<usize>,

    /// A single agent with random actions
    #[arg(short, long, default_value_t = false)]
    random: bool,

    /// Live play: act with the model without training it
    #[arg(short, long, default_value_t = false)]
    play: bool,

    /// Ticks between progress reports
    #[arg(long, default_value_t = 1000)]
    report_interval: usize,

    /// Writes the effective configurations into this directory before running
    #[arg(long)]
    save_configs: Option<PathBuf>,
}

fn scenario_config(args: &Args, arena: &ArenaConfig) -> Result<ScenarioConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default()
            .agent(AgentConfig::default().swap_interval(0.5))
            .spawn(arena.spawn_config()),
    };
    if let Some(n) = args.num_agents {
        config = config.num_agents(n);
    }
    if args.random {
        config = config.scenario_type(ScenarioType::Random);
    }
    if args.play {
        config = config.live_learning(false);
    }
    Ok(config)
}

fn model_config(args: &Args, config: &ScenarioConfig) -> NavigatorConfig {
    NavigatorConfig::default()
        .architecture(ModelArchitecture::navigator(config.policy.num_probes))
        .model_dir(args.model_dir.as_str())
        .seed(config.policy.seed)
}

fn run(args: &Args) -> Result<(ScenarioStat, CoordinatorStat)> {
    let arena_config = match args.arena.as_ref() {
        Some(path) => ArenaConfig::load(path)?,
        None => ArenaConfig::default(),
    };
    let config = scenario_config(args, &arena_config)?;
    let model_config = model_config(args, &config);

    if let Some(dir) = args.save_configs.as_ref() {
        std::fs::create_dir_all(dir)?;
        arena_config.save(dir.join("arena.yaml"))?;
        config.save(dir.join("scenario.yaml"))?;
        model_config.save(dir.join("model.yaml"))?;
        info!("Saved configurations in {:?}", dir);
    }

    // Nothing is trained in live play or random runs.
    let recorder: Box<dyn Recorder + Send> = match config.is_training() {
        true => Box::new(LogRecorder::new("round")),
        false => Box::new(NullRecorder::new()),
    };
    let arena = Arc::new(Arena::build(&arena_config)?);
    let mut scenario =
        Scenario::<NavigatorModel, Arena>::build(config, model_config, arena, recorder)?;

    for t in 1..=args.ticks {
        scenario.tick(args.dt)?;
        if args.report_interval > 0 && t % args.report_interval == 0 {
            info!(
                "tick {}, model version {}\n{}",
                t,
                scenario.coordinator().model_version(),
                scenario.stat().fmt()
            );
        }
    }

    Ok(scenario.shutdown())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (stat, coordinator_stat) = run(&args)?;
    println!("{}", stat.fmt());
    println!("{}", coordinator_stat.fmt());

    Ok(())
}
