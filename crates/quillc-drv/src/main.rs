use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match quillc_drv::parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    quillc_drv::init_logging(config.verbose);

    match quillc_drv::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
