use crate::cli::ServerKind;
use crate::error::CliError;
use crate::settings::Settings;

pub fn run_rewrite_rules(
    server: ServerKind,
    prefix: Option<&str>,
    settings: &Settings,
) -> Result<(), CliError> {
    let rule = settings.rewrite_rule(prefix)?;
    let snippet = match server {
        ServerKind::Apache => rule.apache(),
        ServerKind::Nginx => rule.nginx(),
    };
    println!("{snippet}");
    Ok(())
}
