//! Headless scenario runner: builds a small voxel world, computes a
//! path with the incremental search engine, then drives a simulated
//! agent along it with the path executor, emitting JSONL telemetry.

use std::{env, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use voxelnav_core::{BlockPos, SimTick};
use voxelnav_exec::{ExecStatus, PathExecutor};
use voxelnav_search::{Favoring, Goal, PathSearch, PathStatus, SearchConfig, TravelCaps};
use voxelnav_testkit::{flat_plane, gapped_plane, pooled_plane, walled_plane, JsonlSink, SimAgent};
use voxelnav_world::VoxelWorld;

/// Ground level used by every scenario.
const GROUND_TOP: i32 = 63;

fn main() -> Result<()> {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
    let config = config_from_args()?;
    run_scenario(&config)
}

struct CliConfig {
    scenario: String,
    start: BlockPos,
    goal: BlockPos,
    budget: Duration,
    max_ticks: u64,
    telemetry: Option<PathBuf>,
}

fn config_from_args() -> Result<CliConfig> {
    config_from_iter(env::args().skip(1))
}

fn config_from_iter<I>(mut args: I) -> Result<CliConfig>
where
    I: Iterator<Item = String>,
{
    let mut scenario = String::from("flat");
    let mut start = BlockPos::new(0, GROUND_TOP + 1, 0);
    let mut goal = BlockPos::new(8, GROUND_TOP + 1, 8);
    let mut budget_ms = 10u64;
    let mut max_ticks = 6000u64;
    let mut telemetry: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => {
                scenario = args.next().context("--scenario needs a value")?;
            }
            "--start" => {
                start = parse_pos(&args.next().context("--start needs x,y,z")?)?;
            }
            "--goal" => {
                goal = parse_pos(&args.next().context("--goal needs x,y,z")?)?;
            }
            "--budget-ms" => {
                budget_ms = args
                    .next()
                    .context("--budget-ms needs a value")?
                    .parse()
                    .context("--budget-ms must be an integer")?;
            }
            "--max-ticks" => {
                max_ticks = args
                    .next()
                    .context("--max-ticks needs a value")?
                    .parse()
                    .context("--max-ticks must be an integer")?;
            }
            "--telemetry" => telemetry = args.next().map(PathBuf::from),
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(CliConfig {
        scenario,
        start,
        goal,
        budget: Duration::from_millis(budget_ms),
        max_ticks,
        telemetry,
    })
}

fn parse_pos(text: &str) -> Result<BlockPos> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 3 {
        bail!("position must be x,y,z, got {text}");
    }
    Ok(BlockPos::new(
        parts[0].trim().parse().context("bad x coordinate")?,
        parts[1].trim().parse().context("bad y coordinate")?,
        parts[2].trim().parse().context("bad z coordinate")?,
    ))
}

fn build_world(name: &str) -> Result<VoxelWorld> {
    match name {
        "flat" => Ok(flat_plane(GROUND_TOP, 24)),
        "wall" => Ok(walled_plane(GROUND_TOP, 24, 4, 1)),
        "gap" => Ok(gapped_plane(GROUND_TOP, 24, 3, 4)),
        "pool" => Ok(pooled_plane(
            GROUND_TOP,
            24,
            BlockPos::new(2, 0, -6),
            BlockPos::new(6, 0, 6),
        )),
        other => bail!("unknown scenario: {other}"),
    }
}

#[derive(Serialize)]
struct TickTelemetry {
    tick: SimTick,
    cursor: usize,
    pos: [f64; 3],
    status: String,
}

fn run_scenario(config: &CliConfig) -> Result<()> {
    let mut world = build_world(&config.scenario)?;
    let caps = TravelCaps::default();
    tracing::info!(
        scenario = %config.scenario,
        start = %config.start,
        goal = %config.goal,
        "computing path"
    );

    let mut search = PathSearch::new(
        config.start,
        Goal::Block(config.goal),
        caps.clone(),
        Favoring::new(),
        SearchConfig::default(),
    )?;
    let result = loop {
        let result = search.compute(&world, config.budget);
        if result.status != PathStatus::Partial {
            break result;
        }
        tracing::debug!(visited = result.visited, "search slice yielded");
    };
    tracing::info!(
        status = ?result.status,
        nodes = result.path.len(),
        cost = result.cost,
        visited = result.visited,
        generated = result.generated,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "search finished"
    );
    if result.path.is_empty() {
        bail!("no usable path to {}", config.goal);
    }

    let mut sink = match &config.telemetry {
        Some(path) => Some(JsonlSink::create(path)?),
        None => None,
    };
    let mut executor = PathExecutor::new(&result, &caps)?;
    let mut agent = SimAgent::standing_at(config.start);
    let mut tick = SimTick::ZERO;
    let outcome = loop {
        if tick.0 >= config.max_ticks {
            bail!("execution exceeded {} ticks", config.max_ticks);
        }
        let status = executor.tick(&world, &mut agent.updates, &agent.snapshot);
        if let Some(sink) = sink.as_mut() {
            sink.write_json(&TickTelemetry {
                tick,
                cursor: executor.cursor(),
                pos: agent.snapshot.pos,
                status: format!("{status:?}"),
            })?;
        }
        match status {
            ExecStatus::Done => break Ok(()),
            ExecStatus::Failed(mode) => break Err(mode),
            ExecStatus::Running | ExecStatus::Waiting => {}
        }
        let controls = *executor.controls();
        agent.step(&mut world, &controls);
        tick = tick.advance(1);
    };
    match outcome {
        Ok(()) => {
            tracing::info!(
                ticks = tick.0,
                feet = %agent.snapshot.feet(),
                "path executed to completion"
            );
            Ok(())
        }
        Err(mode) => bail!("execution failed after {} ticks: {mode:?}", tick.0),
    }
}
