use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::CliError;

/// Write the completion script for `shell` to `output_path`, or stdout.
pub fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    let Some(path) = output_path else {
        generate(shell, &mut command, bin_name, &mut io::stdout().lock());
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    generate(shell, &mut command, bin_name, &mut writer);
    writer.flush()?;

    tracing::debug!(%shell, path = %path.display(), "Wrote completion script");
    println!("{}", path.display());
    Ok(())
}
