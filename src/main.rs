use std::process::ExitCode;
use std::time::Duration;

use log::{error, info};

use timetabler::engine::{self, GenerationResult};
use timetabler::io::read_request;

/// Thin CLI over the generation engine: a request document on stdin,
/// a `GenerationResult` document on stdout, exit code 0 iff the
/// generation succeeded.
fn main() -> ExitCode {
    env_logger::init();

    let result = match read_request(std::io::stdin().lock()) {
        Ok(request) => {
            info!(
                "read {} courses, {} faculty, {} classrooms",
                request.entities.courses.len(),
                request.entities.faculty.len(),
                request.entities.classrooms.len()
            );
            engine::generate(&request.config, &request.entities)
        }
        Err(err) => {
            error!("{err}");
            GenerationResult::failure(Default::default(), err.slug(), Duration::ZERO)
        }
    };

    if let Err(err) = timetabler::io::write_result(std::io::stdout().lock(), &result) {
        error!("failed to write result document: {err}");
        return ExitCode::FAILURE;
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
