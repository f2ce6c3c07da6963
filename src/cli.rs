use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Command {
    Post,
    Whoami,
}

#[derive(Parser, Debug, Default)]
#[command(
    about = concat!(env!("CARGO_CRATE_NAME"), " - terminal client for the shared feed"),
    disable_help_flag = true
)]
pub struct Flags {
    /// one-shot command; omit to open the feed
    #[arg(default_value = None)]
    pub command: Option<Command>,
}

impl Flags {
    /// Parse from `std::env::args_os()`, exit on error.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Check if the command is "post"
    pub fn post(&self) -> bool {
        matches!(self.command, Some(Command::Post))
    }

    /// Check if the command is "whoami"
    pub fn whoami(&self) -> bool {
        matches!(self.command, Some(Command::Whoami))
    }
}
