use std::process::ExitCode;

fn main() -> ExitCode {
    workbench_ops::cli::run()
}
