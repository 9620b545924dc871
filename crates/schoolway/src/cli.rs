use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::routing::OptimizerConfig;

#[derive(Parser)]
#[command(name = "schoolway")]
#[command(author, version, about)]
#[command(long_about = "Congestion-aware corridor route planner.\n\n\
    Expands weekly timetables into per-period walking routes and then\n\
    iteratively reroutes the worst-performing students away from crowded\n\
    corridors, one school day at a time.\n\n\
    Examples:\n  \
    schoolway expand timetable.json -o routes.json   Build the initial routes\n  \
    schoolway -f routes.json -d 1                    Optimize day 1 until stopped\n  \
    schoolway -f routes.json_1.json -d 1             Resume from a checkpoint")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Route-state file read on start and rewritten at every checkpoint
    #[arg(short = 'f', long = "route-file")]
    pub route_file: Option<PathBuf>,

    /// Day of the week to optimize (1-based)
    #[arg(short, long)]
    pub day: Option<usize>,

    /// Inner steps between congestion rebuilds
    #[arg(short, long, default_value_t = 10)]
    pub batch_size: u64,

    /// Outer iterations between checkpoint writes
    #[arg(short = 's', long, default_value_t = 500)]
    pub save_steps: u64,

    /// Stop after this many outer iterations (default: run until stopped)
    #[arg(short = 'n', long)]
    pub iterations: Option<u64>,

    /// Edge-list file describing the school graph
    #[arg(long, default_value = "paths.txt")]
    pub paths: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase diagnostic verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress the per-step progress lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand a weekly timetable into an initial route-state file
    Expand {
        /// Timetable JSON: student -> day -> slot -> room
        timetable: PathBuf,

        /// Edge-list file describing the school graph
        #[arg(long, default_value = "paths.txt")]
        paths: PathBuf,

        /// Reuse a precomputed shortest-paths table instead of running
        /// Floyd-Warshall in-process
        #[arg(long)]
        shortest_paths: Option<PathBuf>,

        /// Destination route-state file
        #[arg(short, long, default_value = "routes.json")]
        output: PathBuf,
    },

    /// Compute the room-pair shortest-path table and write it as JSON
    ShortestPaths {
        /// Edge-list file describing the school graph
        #[arg(long, default_value = "paths.txt")]
        paths: PathBuf,

        /// Destination table file
        #[arg(short, long, default_value = "shortest_paths.json")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Expand {
                timetable,
                paths,
                shortest_paths,
                output,
            }) => crate::commands::expand::run(&timetable, &paths, shortest_paths.as_deref(), &output),
            Some(Commands::ShortestPaths { paths, output }) => {
                crate::commands::shortest_paths::run(&paths, &output)
            }
            None => {
                let (Some(route_file), Some(day)) = (&self.route_file, self.day) else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    return Ok(());
                };
                let config = OptimizerConfig {
                    batch_size: self.batch_size,
                    save_steps: self.save_steps,
                    iterations: self.iterations,
                    quiet: self.quiet,
                };
                crate::commands::optimize::run(&self.paths, route_file, day, config)
            }
        }
    }
}
