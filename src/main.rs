use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = corpus_vault::run() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
