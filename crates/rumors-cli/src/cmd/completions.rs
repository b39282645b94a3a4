use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Arguments for `rumors completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for `shell` to stdout, under the command's own name.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    let bin = command.get_name().to_string();
    generate(shell, command, bin, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn listing_command() -> Command {
        Command::new("rumors")
            .subcommand(Command::new("vars").arg(Arg::new("page").long("page")))
            .subcommand(Command::new("list"))
    }

    #[test]
    fn bash_script_names_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut listing_command(), &mut buf).expect("generate");
        let script = String::from_utf8(buf).expect("utf8");
        assert!(script.contains("rumors"));
        assert!(script.contains("vars"));
        assert!(script.contains("--page"));
    }

    #[test]
    fn fish_script_uses_command_name() {
        let mut buf = Vec::new();
        write_completions(Shell::Fish, &mut listing_command(), &mut buf).expect("generate");
        let script = String::from_utf8(buf).expect("utf8");
        assert!(script.contains("complete -c rumors"));
    }
}
