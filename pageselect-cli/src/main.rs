mod command;
mod config;
mod paths;
mod terminal;

use std::fs;
use std::fs::File;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use log::info;
use pageselect_lib::ArticConfig;
use pageselect_lib::Response;
use pageselect_lib::Session;
use pageselect_lib::SessionConfig;
use pageselect_lib::error::Error;
use pageselect_lib::pipeline::PageRequest;
use pageselect_lib::source::ArticSource;
use pageselect_lib::source::DataSource;
use pageselect_lib::source::InMemorySource;
use pageselect_lib::surface::SurfaceEvent;
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::command::Command;
use crate::command::HELP;
use crate::config::CliConfig;
use crate::config::CliError;
use crate::terminal::TextSurface;

type InFlight = Pin<Box<dyn Future<Output = Response> + Send>>;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    init_logging()?;
    let config = CliConfig::load()?;
    info!("starting with {:?}", config);

    let source: Box<dyn DataSource> = if config.offline {
        Box::new(InMemorySource::generated(config.offline_rows))
    } else {
        let mut artic = ArticConfig::default();
        if let Some(url) = &config.base_url {
            artic = artic.with_base_url(url);
        }
        Box::new(ArticSource::new(artic)?)
    };

    let mut session = Session::new(source, SessionConfig::default().with_page_size(config.page_size));
    let mut surface = TextSurface::new(std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Commands are read while a fetch is in flight; a command that needs a
    // page replaces the fetch, and superseded responses are dropped.
    let mut in_flight: Option<InFlight> = None;
    match session.begin(SurfaceEvent::PageChangeRequested(1)) {
        Ok(request) => in_flight = request.map(|r| start_fetch(&session, r)),
        Err(e) => report(&e),
    }
    session.render(&mut surface);
    prompt()?;

    loop {
        tokio::select! {
            response = wait(&mut in_flight) => {
                in_flight = match session.complete(response) {
                    Ok(next) => next.map(|r| start_fetch(&session, r)),
                    Err(e) => {
                        report(&e);
                        None
                    }
                };
                session.render(&mut surface);
                prompt()?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e);
                        prompt()?;
                        continue;
                    }
                };

                match command {
                    Command::Quit => break,
                    Command::Help => println!("{}", HELP),
                    command => {
                        match execute(&mut session, command) {
                            Ok(Some(request)) => in_flight = Some(start_fetch(&session, request)),
                            Ok(None) => {}
                            Err(e) => report(&e),
                        }
                        session.render(&mut surface);
                    }
                }
                prompt()?;
            }
        }
    }

    info!(
        "exiting with {} rows selected",
        session.pipeline().selection().len()
    );
    Ok(())
}

fn start_fetch<S: DataSource + 'static>(session: &Session<S>, request: PageRequest) -> InFlight {
    Box::pin(session.fetch(request))
}

/// Resolves with the in-flight response, or never if nothing is in flight.
///
/// Polls by reference so the fetch survives when another branch wins.
async fn wait(in_flight: &mut Option<InFlight>) -> Response {
    match in_flight {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}

fn execute<S: DataSource + 'static>(
    session: &mut Session<S>,
    command: Command,
) -> Result<Option<PageRequest>, Error> {
    match command {
        Command::Next => session.pipeline_mut().next_page().map(Some),
        Command::Previous => session.pipeline_mut().previous_page().map(Some),
        Command::Page(index) => session.begin(SurfaceEvent::PageChangeRequested(index)),
        Command::Select(n) => session.begin(SurfaceEvent::TargetCountChanged(n)),
        Command::Toggle(keys) => {
            for key in keys {
                session.pipeline_mut().toggle_row(&key)?;
            }
            Ok(None)
        }
        Command::CheckAll => session.pipeline_mut().set_visible_checked(true).map(|()| None),
        Command::UncheckAll => session.pipeline_mut().set_visible_checked(false).map(|()| None),
        Command::Clear => session.begin(SurfaceEvent::ClearSelection),
        Command::Show | Command::Help | Command::Quit => Ok(None),
    }
}

/// Fetch failures are already part of the rendered view.
fn report(error: &Error) {
    log::warn!("{}", error);
    if !matches!(error, Error::Fetch(_)) {
        eprintln!("{}", error);
    }
}

fn prompt() -> Result<(), CliError> {
    let mut out = std::io::stdout();
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn init_logging() -> Result<(), CliError> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let log_file = File::create(&path)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .map_err(|e| CliError::Logging(e.to_string()))
}
