//! Signup Form - a validated sign-up form with a terminal front end
//!
//! Runs the form interactively in the terminal, submits a JSON record
//! headlessly, or serves the mock backend the form talks to.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use signup_form::app::{App, MountedForm};
use signup_form::config::FormConfig;
use signup_form::server::{self, ServerSettings};
use signup_form::state::SubmitOutcome;
use signup_form::ui;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "signup-form")]
#[command(version)]
#[command(about = "Sign-up form with field validation and a mock backend")]
struct Args {
    /// Serve the static page and the mock `/api/users` endpoint
    #[arg(long)]
    serve: bool,

    /// Submit the form data in this JSON file without opening the UI
    #[arg(long, value_name = "FILE")]
    submit: Option<PathBuf>,

    /// Fixture the mock server replies with (success, error, progress)
    #[arg(long)]
    fixture: Option<String>,

    /// Port for the mock server
    #[arg(short, long)]
    port: Option<u16>,

    /// Where the form is submitted
    #[arg(short, long)]
    url: Option<String>,

    /// Save the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    /// Layer command-line overrides on top of the config file
    fn apply(&self, config: &mut FormConfig) {
        if let Some(fixture) = &self.fixture {
            config.fixture = Some(fixture.clone());
        }
        if let Some(port) = self.port {
            config.server_port = Some(port);
        }
        if let Some(url) = &self.url {
            config.submit_url = Some(url.clone());
        }
    }

    fn is_interactive(&self) -> bool {
        !self.serve && self.submit.is_none() && !self.write_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the terminal UI quiet unless asked otherwise
    let default_filter = if args.is_interactive() {
        "signup_form=warn"
    } else {
        "signup_form=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = FormConfig::load()?;
    config.apply_env();
    args.apply(&mut config);

    if args.write_config {
        config.save()?;
        println!("Configuration saved");
        return Ok(());
    }

    if args.serve {
        return server::serve(ServerSettings {
            port: config.server_port(),
            static_dir: config.static_dir(),
            fixture: config.fixture_path(),
        })
        .await;
    }

    if let Some(path) = &args.submit {
        let succeeded = submit_file(&config, path).await?;
        if !succeeded {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_tui(&config).await
}

/// Fill the form from a JSON file and submit it, following resubmits
async fn submit_file(config: &FormConfig, path: &Path) -> Result<bool> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let data: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut mounted = MountedForm::new(config)?;
    mounted.form.set_data_json(&data)?;

    let outcome = mounted.submit_to_completion().await?;
    match &outcome {
        SubmitOutcome::Succeeded => println!("Success"),
        SubmitOutcome::Rejected { error_fields } => {
            println!("Rejected: {} invalid field(s)", error_fields.len());
            for message in mounted.form.errors() {
                println!("  - {message}");
            }
        }
        SubmitOutcome::Failed { reason } => println!("Error: {reason}"),
        SubmitOutcome::Unreachable { reason } => println!("Unreachable: {reason}"),
        SubmitOutcome::RetryScheduled { .. } => {}
    }

    Ok(matches!(outcome, SubmitOutcome::Succeeded))
}

async fn run_tui(config: &FormConfig) -> Result<()> {
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key).await?;
            }
        }

        // Resubmits scheduled by a "progress" reply
        app.poll_form_events().await?;

        if app.should_quit() {
            return Ok(());
        }
    }
}
