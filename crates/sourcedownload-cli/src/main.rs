use sourcedownload_lib::cli::{
    Command, ResolvedCommand, parse_args, resolve_command, run_fetch, run_list,
};
use sourcedownload_lib::error::SourceDownloadError;
use std::process::ExitCode;

async fn run(command: Command) -> Result<(), SourceDownloadError> {
    color_eyre::install()?;

    match resolve_command(command)? {
        ResolvedCommand::Fetch(params) => {
            run_fetch(params).await?;
            println!("Download complete");
        }
        ResolvedCommand::List(params) => run_list(params).await?,
    }

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = parse_args();

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
