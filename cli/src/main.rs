// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # lanwake CLI Entry Point
//!
//! Bootstraps the runtime and the global logging setup, maps the parsed
//! arguments to configuration and dispatches to `commands/`. Errors from any
//! command end up here, get logged once and become a non-zero exit code.

mod commands;
mod server;
mod terminal;

use std::process::ExitCode;

use lanwake_common::{config::Config, error};

use crate::{
    commands::{CommandLine, Commands, discover, info, serve, wake},
    terminal::{print::Print, spinner},
};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    spinner::init_logging(commands.verbosity, commands.quiet);

    let cfg = Config::from(&commands);

    if let Err(e) = Print::init(&cfg) {
        error!("{e}");
    }
    Print::banner();

    let result = match commands.command {
        Commands::Info => info::info(),
        Commands::Serve {
            port,
            iface,
            scanner,
        } => serve::serve(port, iface, scanner.into()).await,
        Commands::Discover { iface, scanner } => discover::discover(&iface, scanner.into()).await,
        Commands::Wake { mac, iface } => wake::wake(mac, &iface).await,
    };

    let exit_code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e:#}");
            ExitCode::FAILURE
        }
    };

    Print::end_of_program();

    exit_code
}
