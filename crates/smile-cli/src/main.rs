use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smile", about = "BigSMILE capture daemon CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show controller status
    Status,
    /// Set the smile-trigger threshold (0-100)
    SetThreshold {
        /// New threshold; out-of-range values are clamped
        value: i32,
    },
    /// Confirm the capture awaiting review
    Confirm,
    /// Discard the capture awaiting review
    Cancel,
    /// Toggle between back and front camera
    Flip,
    /// Inject one detection frame (diagnostics)
    Push {
        /// Smiling probability for the injected face, 0.0-1.0
        #[arg(long, default_value_t = 1.0)]
        probability: f32,
    },
}

#[zbus::proxy(
    interface = "org.bigsmile.Camera1",
    default_service = "org.bigsmile.Camera1",
    default_path = "/org/bigsmile/Camera1"
)]
trait Camera1 {
    async fn status(&self) -> zbus::Result<String>;
    async fn set_threshold(&self, value: i32) -> zbus::Result<u8>;
    async fn confirm_save(&self) -> zbus::Result<bool>;
    async fn cancel_save(&self) -> zbus::Result<bool>;
    async fn flip_facing(&self) -> zbus::Result<String>;
    async fn push_detection(&self, payload: &str) -> zbus::Result<()>;
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let conn = zbus::Connection::session().await?;
    let proxy = Camera1Proxy::new(&conn).await?;

    match cli.command {
        Commands::Status => {
            let raw = proxy.status().await?;
            // Re-serialize pretty for terminal reading.
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::SetThreshold { value } => {
            let stored = proxy.set_threshold(value).await?;
            println!("threshold set to {stored}");
        }
        Commands::Confirm => {
            if proxy.confirm_save().await? {
                println!("capture confirmed; saving");
            } else {
                println!("nothing awaiting confirmation");
            }
        }
        Commands::Cancel => {
            if proxy.cancel_save().await? {
                println!("capture discarded");
            } else {
                println!("nothing awaiting confirmation");
            }
        }
        Commands::Flip => {
            let facing = proxy.flip_facing().await?;
            println!("camera facing: {facing}");
        }
        Commands::Push { probability } => {
            let payload = serde_json::json!({
                "faces": [{ "smilingProbability": probability }]
            })
            .to_string();
            proxy.push_detection(&payload).await?;
            println!("detection frame pushed (p={probability})");
        }
    }

    Ok(())
}
