use std::sync::{Arc, Mutex};

use newsbar::aggregator::Aggregator;
use newsbar::app::{NewsBar, NewsBarHandle};
use newsbar::config::Config;
use newsbar::display::{DisplayCycle, TickerTiming};
use newsbar::menu::Menu;
use newsbar::models::SourceId;
use newsbar::sources::{http_client, FeedSource, HackerNewsSource, HeadlineSource};
use newsbar::terminal::{help_text, Command, TerminalSurface};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TICKER_COLUMNS: usize = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsbar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::load_or_default("newsbar.toml")?;
    info!(
        "Refreshing every {} minutes, {} headlines per source",
        config.refresh_interval, config.headlines_per_source
    );

    let client = http_client()?;
    let sources: Vec<Arc<dyn HeadlineSource>> = vec![
        Arc::new(FeedSource::new(
            SourceId::Bbc,
            client.clone(),
            &config.sources.bbc_feed_url,
            config.headlines_per_source,
        )),
        Arc::new(HackerNewsSource::new(
            client,
            &config.sources.hn_top_stories_url,
            &config.sources.hn_item_base_url,
            config.headlines_per_source,
        )),
    ];

    let aggregator = Aggregator::new(sources);
    info!("Aggregating {} sources", aggregator.source_count());

    let surface = TerminalSurface::new(TICKER_COLUMNS);
    let menu = surface.menu_view();

    let app = NewsBar::new(
        aggregator,
        DisplayCycle::new(TickerTiming::from_config(&config.ticker)),
        config.refresh_period(),
        surface,
    );

    let handle = app.handle();
    tokio::spawn(read_commands(handle.clone(), menu));

    let ctrl_c_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_handle.shutdown();
        }
    });

    eprintln!("{}", help_text());
    app.run().await;

    Ok(())
}

async fn read_commands(handle: NewsBarHandle, menu: Arc<Mutex<Menu>>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match Command::parse(&line) {
            Some(Command::Refresh) => handle.manual_refresh(),
            Some(Command::Quit) => {
                handle.shutdown();
                break;
            }
            Some(Command::Menu) => {
                if let Ok(menu) = menu.lock() {
                    print!("\n{}", newsbar::terminal::render_menu(&menu));
                }
            }
            Some(Command::Open(number)) => {
                let url = menu
                    .lock()
                    .ok()
                    .and_then(|m| m.entry(number).map(|e| e.url.to_string()));
                match url {
                    Some(url) => println!("\n{}", url),
                    None => eprintln!("no headline numbered {}", number),
                }
            }
            Some(Command::Help) | None => eprintln!("{}", help_text()),
        }
    }
}
