//! Viewer binary.
//!
//! ```text
//! glintwater [config.json]
//! ```

use std::process::ExitCode;

use glintwater::Options;

fn main() -> ExitCode {
    glintwater::init();

    let options = match std::env::args_os().nth(1) {
        Some(path) => match Options::from_json_file(&path) {
            Ok(options) => options,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    match glintwater::show(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
