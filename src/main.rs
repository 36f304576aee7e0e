use clap::{Parser, Subcommand};
use conductor_rs::conductor::config::AppConfig;
use conductor_rs::conductor::orchestrator::{AgentRequest, Orchestrator};
use conductor_rs::conductor::server;
use dotenv::dotenv;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one agent from the command line
    Run {
        /// planner, researcher, coder, writer, analyst_visualizer or pipeline
        #[arg(short, long)]
        agent: String,

        /// The user's goal
        #[arg(short, long)]
        objective: String,

        /// Research context seeded into single-step agents
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await?;
        }
        Commands::Run {
            agent,
            objective,
            context,
        } => {
            let orchestrator = Orchestrator::from_config(&config).await?;

            let output = if agent == "pipeline" {
                orchestrator.run_pipeline(&objective).await?
            } else {
                let mut request = AgentRequest::new(agent, objective);
                request.context = context;
                orchestrator.execute(&request).await?
            };
            orchestrator.shutdown().await?;

            println!("{}", output);
        }
    }

    Ok(())
}
