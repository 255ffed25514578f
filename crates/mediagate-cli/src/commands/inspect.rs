use std::time::Duration;

use mediagate_core::{ConditionalRequest, FileResponder, FileResponse};

use crate::commands::common::requested_path;
use crate::error::CliError;
use crate::settings::Settings;

pub struct InspectOptions {
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub max_age: Duration,
}

pub fn run_inspect(path: &str, options: InspectOptions, settings: &Settings) -> Result<(), CliError> {
    let uploads = settings.uploads()?;
    let requested = requested_path(path, &uploads)?;
    let validators = ConditionalRequest::new(options.if_none_match, options.if_modified_since);

    let response =
        FileResponder::new(options.max_age).serve(&uploads.path_for(&requested), &validators)?;
    for line in render_response(&response) {
        println!("{line}");
    }
    Ok(())
}

pub fn render_response(response: &FileResponse) -> Vec<String> {
    match response {
        FileResponse::NotModified => vec!["HTTP/1.1 304 Not Modified".to_string()],
        FileResponse::Full(file) => std::iter::once("HTTP/1.1 200 OK".to_string())
            .chain(
                file.headers()
                    .into_iter()
                    .map(|(name, value)| format!("{name}: {value}")),
            )
            .collect(),
    }
}
