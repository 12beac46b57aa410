//! Arthabit CLI - Expense tracking in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{add, expenses, login, logout, logs, profile, signup, status};

/// Arthabit - expense tracking in your terminal
#[derive(Parser)]
#[command(name = "ah", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session status, probing the backend with the stored tokens
    Status {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Sign in with username and password
    Login {
        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Create an account and sign in
    Signup {
        /// First name (prompted when omitted)
        #[arg(long)]
        first_name: Option<String>,
        /// Last name (prompted when omitted)
        #[arg(long)]
        last_name: Option<String>,
        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,
        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
        /// Phone number (prompted when omitted)
        #[arg(long)]
        phone: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Drop the stored session
    Logout {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// List recorded expenses
    Expenses {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Record a new expense
    Add {
        /// Amount to record (prompted when omitted)
        amount: Option<String>,
        /// Merchant name (prompted when omitted)
        merchant: Option<String>,
        /// Currency code (INR or USD)
        #[arg(long, default_value = "INR")]
        currency: String,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user's profile
    Profile {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Login { username, password, json } => login::run(username, password, json),
        Commands::Signup { first_name, last_name, username, email, phone, password, json } => {
            signup::run(first_name, last_name, username, email, phone, password, json)
        }
        Commands::Logout { json } => logout::run(json),
        Commands::Expenses { json } => expenses::run(json),
        Commands::Add { amount, merchant, currency, json } => {
            add::run(amount, merchant, &currency, json)
        }
        Commands::Profile { json } => profile::run(json),
        Commands::Logs { command } => logs::run(command),
    }
}
