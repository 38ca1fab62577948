/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use tracing::info;
use vacuum_cleaner::config::SimulationConfig;
use vacuum_cleaner::position::DEFAULT_ROOM_SIZE;
use vacuum_cleaner::study::AgentKind;
use vacuum_cleaner::vacuum_world::{GridWorld, SimulationOutcome};
use vacuum_cleaner::{Rng, Simulation};

// Chapter 2 Intelligent Agents, Exercise 14.
//
// The vacuum world where the agent cannot see its location, only feel walls with bump sensors,
// and where the dirt sensor may be unreliable. Runs one agent once and shows the room before and
// after.
#[derive(Parser, Debug)]
#[command(
    name = "run-vacuum-agent-once",
    version,
    about = "Run one vacuum agent in one randomly dirtied room"
)]
struct Cli {
    /// randomized, simple-reflex, model-based or confidence-weighted.
    #[arg(long, default_value_t = AgentKind::ModelBased)]
    agent: AgentKind,

    /// JSON simulation config. Flags below override its fields.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    room_size: Option<usize>,

    #[arg(long)]
    dirt_prob: Option<f64>,

    #[arg(long)]
    max_steps: Option<u32>,

    /// Probability that the dirt sensor lies.
    #[arg(long)]
    dirt_error_rate: Option<f64>,

    /// Probability that each bump sensor lies.
    #[arg(long)]
    boundary_error_rate: Option<f64>,

    /// Tell model-based agents the real room size instead of letting them assume 5x5.
    #[arg(long)]
    agent_knows_room_size: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(?config, agent = %cli.agent, seed = cli.seed, "starting run");

    let mut rng = Rng::seed_from_u64(cli.seed);
    let environment = GridWorld::from_config(&config, &mut rng);
    println!("Starting room (D = dirty, C = clean, A = agent):");
    println!("{}", environment);

    let assumed_room_size = if cli.agent_knows_room_size {
        config.room_size
    } else {
        DEFAULT_ROOM_SIZE
    };
    let agent = cli.agent.build(assumed_room_size);
    let mut simulation = Simulation::new(environment, agent, config.max_steps);
    let succeeded = simulation.run(&mut rng);
    let outcome = SimulationOutcome::from_simulation(&simulation, succeeded);

    println!("Final room:");
    println!("{}", simulation.environment());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("success: {}", outcome.succeeded);
        println!("energy: {}", outcome.energy_spent);
        println!("steps: {}", outcome.steps_taken);
        println!("dirty squares left: {}", outcome.cells_left_dirty);
        println!("score: {}", outcome.performance);
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(room_size) = cli.room_size {
        config.room_size = room_size;
    }
    if let Some(dirt_prob) = cli.dirt_prob {
        config.dirt_prob = dirt_prob;
    }
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(rate) = cli.dirt_error_rate {
        config.dirt_sensor_error_rate = rate;
    }
    if let Some(rate) = cli.boundary_error_rate {
        config.boundary_sensor_error_rate = rate;
    }
    config.validate()?;
    Ok(config)
}
