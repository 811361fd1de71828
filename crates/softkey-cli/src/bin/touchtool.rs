use clap::{Parser, Subcommand};

use softkey_cli::commands::{config_ops, inspect_ops, replay_ops};

#[derive(Parser)]
#[command(name = "touchtool", about = "Soft keyboard touch engine diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSONL pointer trace and print the listener callbacks
    Replay {
        /// Keyboard TOML file ([[keys]] list)
        keyboard_file: String,
        /// Pointer trace, one JSON event per line
        trace_file: String,
        /// Settings TOML file (default: embedded settings)
        #[arg(long)]
        settings: Option<String>,
        /// Fire timers due up to this time after the last event
        #[arg(long)]
        until: Option<u64>,
        /// Output as JSON lines instead of text
        #[arg(long)]
        json: bool,
        /// Only callbacks that reach the text engine
        #[arg(long)]
        input_only: bool,
    },
    /// Show the geometry index built for a keyboard
    Inspect {
        /// Keyboard TOML file ([[keys]] list)
        keyboard_file: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Settings file operations
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the default settings TOML
    Export {
        /// Print the parsed defaults re-serialized instead of the embedded file
        #[arg(long)]
        resolved: bool,
    },
    /// Validate a settings TOML file
    Validate {
        /// Settings file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            keyboard_file,
            trace_file,
            settings,
            until,
            json,
            input_only,
        } => replay_ops::replay_cmd(
            &keyboard_file,
            &trace_file,
            settings.as_deref(),
            until,
            json,
            input_only,
        ),
        Command::Inspect {
            keyboard_file,
            json,
        } => inspect_ops::inspect_cmd(&keyboard_file, json),
        Command::Settings { action } => match action {
            SettingsAction::Export { resolved } => config_ops::settings_export(resolved),
            SettingsAction::Validate { file } => config_ops::settings_validate(&file),
        },
    }
}
