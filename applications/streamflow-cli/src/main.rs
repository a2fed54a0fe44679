/// StreamFlow - terminal player for a StreamFlow backend
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use streamflow_cli::{commands, AppConfig, Command, PlayRequest, PlayerApp};
use streamflow_client::StreamFlowClient;
use streamflow_playback::RepeatMode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "streamflow")]
#[command(about = "StreamFlow terminal player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./streamflow.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print an access token
    Login {
        /// Account email (default: auth.email from config)
        #[arg(short, long)]
        email: Option<String>,
        /// Password
        #[arg(short, long, env = "STREAMFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Play songs or a playlist, then read commands from stdin
    Play {
        /// Song ids, in play order
        track_ids: Vec<String>,
        /// Queue position to start from
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Start with shuffle on
        #[arg(long)]
        shuffle: bool,
        /// Repeat mode: off, all or one
        #[arg(long, value_parser = commands::parse_repeat)]
        repeat: Option<RepeatMode>,
        /// Playlist id; its songs are used when no song ids are given
        #[arg(long)]
        playlist: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "streamflow=info,streamflow_cli=info,streamflow_playback=info,streamflow_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Login { email, password } => {
            login(&config, email, password).await?;
        }
        Commands::Play {
            track_ids,
            start,
            shuffle,
            repeat,
            playlist,
        } => {
            config.player.shuffle |= shuffle;
            if let Some(repeat) = repeat {
                config.player.repeat = repeat;
            }
            let request = PlayRequest {
                track_ids,
                start,
                playlist,
            };
            play(&config, &request).await?;
        }
    }

    Ok(())
}

async fn login(
    config: &AppConfig,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = email
        .or_else(|| config.auth.email.clone())
        .ok_or_else(|| anyhow::anyhow!("--email is required"))?;
    let password = password
        .or_else(|| config.auth.password.clone())
        .ok_or_else(|| anyhow::anyhow!("--password or STREAMFLOW_PASSWORD is required"))?;

    let client = StreamFlowClient::new(config.server_config())?;
    let response = client.login(&email, &password).await?;

    println!("{}", response.access_token);
    eprintln!("export STREAMFLOW_AUTH__ACCESS_TOKEN=<token above> to skip logging in");
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<StreamFlowClient> {
    let client = StreamFlowClient::new(config.server_config())?;
    if !client.is_authenticated() {
        if let (Some(email), Some(password)) = (&config.auth.email, &config.auth.password) {
            client.login(email, password).await?;
        }
    }
    Ok(client)
}

async fn play(config: &AppConfig, request: &PlayRequest) -> anyhow::Result<()> {
    let client = connect(config).await?;
    let app = PlayerApp::new(&client, &config.player, Duration::from_secs(1));

    if let Err(e) = app.start(&client, request).await {
        for line in app.drain_event_lines().await {
            println!("{}", line);
        }
        app.shutdown().await;
        return Err(e.into());
    }

    println!("{}", commands::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        for line in app.drain_event_lines().await {
            println!("{}", line);
        }

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{} (type 'help')", e);
                continue;
            }
        };

        match app.execute(command).await {
            Ok((true, message)) => println!("{}", message),
            Ok((false, _)) => break,
            Err(e) => println!("error: {}", e),
        }
    }

    app.shutdown().await;
    Ok(())
}
