// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use cluster_ops::cli::display::StatusIcon;
use cluster_ops::cli::{CliArgs, Commands};
use colored::Colorize;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = CliArgs::parse();

    let result = match args.command {
        Commands::Restart(cmd) => cmd.execute().await,
        Commands::Upgrade(cmd) => cmd.execute().await,
        Commands::VerticalScale(cmd) => cmd.execute().await,
        Commands::HorizontalScale(cmd) => cmd.execute().await,
        Commands::VolumeExpand(cmd) => cmd.execute().await,
        Commands::Configure(cmd) => cmd.execute().await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", StatusIcon::ERROR.red(), e);
        std::process::exit(1);
    }
}
