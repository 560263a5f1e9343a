use std::process::ExitCode;

fn main() -> ExitCode {
    // `.env` first so `BBQ_LOG` and the `BBQ_*` option defaults can live there.
    dotenvy::dotenv().ok();
    bbq_tune::logging::init_tracing();

    match bbq_tune::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
