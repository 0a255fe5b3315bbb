use sniffer::adapters::JqCommandEvaluator;
use sniffer::app::{spawn_feed, start_evaluator, App, AppMessage};
use sniffer::error::SystemError;
use sniffer::logging;
use sniffer::startup::{StartupAction, ViewerConfig, USAGE};
use sniffer::terminal::{setup_panic_hook, TerminalManager};
use sniffer::traits::QueryEvaluator;
use sniffer::ui;
use sniffer::view::ViewController;

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::Terminal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<()> {
    // Resolve flags before touching the terminal
    let config = match ViewerConfig::load() {
        Ok(StartupAction::Run(config)) => config,
        Ok(StartupAction::PrintVersion) => {
            println!("sniffer {}", VERSION);
            std::process::exit(0);
        }
        Ok(StartupAction::PrintHelp) => {
            print!("{}", USAGE);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("sniffer: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    color_eyre::install()?;

    // Setup panic hook to ensure terminal cleanup on panic
    setup_panic_hook();

    let logging_result = match &config.log_file {
        Some(path) => logging::init_with_file(path),
        None => Err(SystemError::NoCacheDirectory),
    };
    if let Err(e) = logging_result {
        eprintln!("sniffer: logging disabled. {}", e.user_message());
    }
    info!("sniffer {} starting, feed {}", VERSION, config.feed.url);

    let runtime = tokio::runtime::Runtime::new()?;

    let mut manager = TerminalManager::new()?;
    let mut app = App::with_view(ViewController::with_window(config.window));

    let result = runtime.block_on(async {
        let evaluator: Arc<dyn QueryEvaluator> = Arc::new(JqCommandEvaluator::new(
            config.jq_command.clone(),
            config.jq_timeout,
        ));
        let queue = start_evaluator(evaluator, app.message_tx.clone());
        app.attach_evaluations(queue);

        spawn_feed(config.feed.clone(), app.message_tx.clone());

        run_app(manager.terminal(), &mut app).await
    });

    manager.restore()?;
    if let Err(e) = &result {
        warn!("Exited with error: {}", e);
    } else {
        info!("sniffer exiting");
    }

    // Dropping the runtime cancels the feed and evaluation tasks
    drop(runtime);
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();

    loop {
        // Draw the UI only when needed
        if app.needs_redraw {
            terminal.draw(|f| {
                ui::render(f, &mut *app);
            })?;
            app.needs_redraw = false;
        }

        let timeout = tokio::time::sleep(std::time::Duration::from_millis(16));

        tokio::select! {
            _ = timeout => {
                app.tick();
            }

            event_result = event_stream.next() => {
                match event_result {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key);
                    }
                    Some(Ok(Event::Paste(text))) => {
                        app.handle_paste(&text);
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        app.mark_dirty();
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal event error: {}", e);
                    }
                    None => {
                        // Input closed; nothing more can drive the UI
                        app.quit();
                    }
                }
            }

            msg = async {
                match &mut message_rx {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(msg) = msg {
                    app.handle_message(msg);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
