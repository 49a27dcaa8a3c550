use clap::Parser;
use taxbae::api::{Cli, Command, run_cli, run_http_server};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    taxbae::logger::init(cli.verbose);

    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = run_http_server(args.socket_addr()).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        command => match run_cli(command) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                tracing::error!("Calculation failed: {e}");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
