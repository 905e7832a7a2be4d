use clap::Parser;
use meetflow_cli::{cli::Cli, commands, context::CommandContext, logging};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let ctx = match CommandContext::new(cli.base_url, cli.credentials, cli.json) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(target = "meetflow", error = %err, "failed to initialize");
            std::process::exit(1);
        }
    };
    ctx.client.restore_session();

    if let Err(err) = commands::dispatch(cli.command, &ctx).await {
        error!(target = "meetflow", error = %err, "command failed");
        std::process::exit(1);
    }
}
