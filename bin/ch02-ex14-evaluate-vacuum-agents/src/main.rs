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

#![warn(missing_docs)]

//! Chapter 2, Exercise 14, Evaluate Vacuum Agents.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use vacuum_cleaner::config::SimulationConfig;
use vacuum_cleaner::position::DEFAULT_ROOM_SIZE;
use vacuum_cleaner::study::{run_trials, AgentKind, TrialSummary};

// Compare the randomized, simple reflex and model-based agents across room sizes. With
// --dirt-error-rate 0.1 this is the imperfect dirt sensor study, and --boundary-error-rate
// exercises unreliable bump sensors.
#[derive(Parser, Debug)]
#[command(
    name = "evaluate-vacuum-agents",
    version,
    about = "Average the performance of vacuum agents over many random rooms"
)]
struct Cli {
    /// Room sizes to study, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = vec![5, 10, 100])]
    room_sizes: Vec<usize>,

    /// Agents to study, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = AgentKind::ALL)]
    agents: Vec<AgentKind>,

    /// Independent runs per room size and agent.
    #[arg(long, default_value_t = 100)]
    trials: usize,

    /// Energy budget per square of the room, used unless a max steps is given.
    #[arg(long, default_value_t = 10)]
    steps_per_square: u32,

    /// JSON simulation config. Its room size is replaced by each of the room sizes.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

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

    /// Print the results as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct StudyRow {
    room_size: usize,
    agent: AgentKind,
    summary: TrialSummary,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let base = load_config(&cli)?;

    let mut rows = Vec::new();
    for &room_size in &cli.room_sizes {
        let config = SimulationConfig {
            room_size,
            max_steps: match cli.max_steps {
                Some(max_steps) => max_steps,
                None => energy_budget(room_size, cli.steps_per_square)?,
            },
            ..base
        };
        config
            .validate()
            .with_context(|| format!("room size {}", room_size))?;
        let assumed_room_size = if cli.agent_knows_room_size {
            room_size
        } else {
            DEFAULT_ROOM_SIZE
        };

        for &agent in &cli.agents {
            info!(room_size, %agent, trials = cli.trials, "running trials");
            let outcomes = run_trials(agent, assumed_room_size, &config, cli.trials, cli.seed);
            if let Some(summary) = TrialSummary::from_outcomes(&outcomes, room_size) {
                rows.push(StudyRow {
                    room_size,
                    agent,
                    summary,
                });
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_table(&rows);
    }
    Ok(())
}

/// `steps_per_square` steps for every square of the room.
fn energy_budget(room_size: usize, steps_per_square: u32) -> Result<u32> {
    room_size
        .checked_mul(room_size)
        .and_then(|squares| u32::try_from(squares).ok())
        .and_then(|squares| squares.checked_mul(steps_per_square))
        .ok_or_else(|| {
            anyhow!(
                "energy budget for a {0}x{0} room at {1} steps per square does not fit in u32",
                room_size,
                steps_per_square
            )
        })
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
    if let Some(dirt_prob) = cli.dirt_prob {
        config.dirt_prob = dirt_prob;
    }
    if let Some(rate) = cli.dirt_error_rate {
        config.dirt_sensor_error_rate = rate;
    }
    if let Some(rate) = cli.boundary_error_rate {
        config.boundary_sensor_error_rate = rate;
    }
    Ok(config)
}

fn print_table(rows: &[StudyRow]) {
    println!(
        "{:<10} {:<22} {:>18} {:>9} {:>8} {:>8} {:>11} {:>13}",
        "size", "agent", "energy", "success", "min", "max", "dirty left", "energy/clean"
    );
    println!("{}", "-".repeat(106));
    for row in rows {
        let s = &row.summary;
        let efficiency = s
            .energy_per_clean_cell
            .map_or_else(|| "inf".to_string(), |e| format!("{:.2}", e));
        println!(
            "{:<10} {:<22} {:>18} {:>8.1}% {:>8} {:>8} {:>11.1} {:>13}",
            format!("{0}x{0}", row.room_size),
            row.agent.to_string(),
            format!("{:.1} ± {:.1}", s.mean_energy, s.std_energy),
            s.success_rate,
            s.min_energy,
            s.max_energy,
            s.mean_cells_left_dirty,
            efficiency,
        );
    }
}
