use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bazaar", about = "Bazaar API operations CLI", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Check a running instance's health endpoint")]
    Health {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port } => crate::serve(port).await,
        Commands::Migrate => {
            crate::database::manager::DatabaseManager::migrate().await?;
            println!("migrations applied");
            Ok(())
        }
        Commands::Health { url } => {
            let endpoint = format!("{}/health", url.trim_end_matches('/'));
            let response = reqwest::get(&endpoint).await?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            println!("{} {}", status, body);
            if status.is_success() {
                Ok(())
            } else {
                anyhow::bail!("health check against {} failed", endpoint)
            }
        }
    }
}
