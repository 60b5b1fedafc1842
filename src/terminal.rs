//! Line-oriented terminal rendering for the `newsbar` binary.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::display::Announcement;
use crate::menu::Menu;
use crate::surface::Surface;

pub const ICON: &str = "[news]";

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Open(usize),
    Menu,
    Quit,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let command = match parts.next()? {
            "r" | "refresh" => Command::Refresh,
            "m" | "menu" => Command::Menu,
            "q" | "quit" => Command::Quit,
            "h" | "help" | "?" => Command::Help,
            "o" | "open" => Command::Open(parts.next()?.parse().ok()?),
            _ => return None,
        };
        Some(command)
    }
}

pub fn help_text() -> &'static str {
    "commands: r = refresh now, m = show menu, o N = show link N, q = quit"
}

/// Renders the menu as numbered plain text.
pub fn render_menu(menu: &Menu) -> String {
    let mut out = String::new();

    if menu.is_loading() {
        out.push_str(Menu::LOADING_LABEL);
        out.push('\n');
    }

    let mut number = 1;
    for section in menu.sections() {
        out.push_str(&format!("== {} ==\n", section.source));
        for entry in &section.entries {
            out.push_str(&format!("{:>3}. {}\n", number, entry.label));
            number += 1;
        }
    }

    if let Some(updated) = menu.updated_label() {
        out.push_str(&format!("({})\n", updated));
    }

    for action in menu.actions() {
        out.push_str(&format!("[{}] {}\n", action.shortcut(), action.label()));
    }

    out
}

/// Prints the menu on every refresh and animates the ticker on one line.
pub struct TerminalSurface {
    columns: usize,
    menu: Arc<Mutex<Menu>>,
    ticker: Option<JoinHandle<()>>,
}

impl TerminalSurface {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            menu: Arc::new(Mutex::new(Menu::loading())),
            ticker: None,
        }
    }

    /// Shared view of the last rendered menu, for command handling.
    pub fn menu_view(&self) -> Arc<Mutex<Menu>> {
        self.menu.clone()
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Surface for TerminalSurface {
    fn on_idle(&mut self) {
        self.stop_ticker();
        println!("\r{:width$}\r{}", "", ICON, width = self.columns);
    }

    fn on_announce(&mut self, announcement: &Announcement) {
        self.stop_ticker();

        let announcement = announcement.clone();
        let columns = self.columns;
        self.ticker = Some(tokio::spawn(async move {
            let started = Instant::now();
            let mut frames = tokio::time::interval(FRAME_INTERVAL);
            loop {
                frames.tick().await;
                let elapsed = started.elapsed();
                if elapsed >= announcement.total_duration() {
                    break;
                }
                print!("\r{}", announcement.frame(elapsed, columns));
                let _ = std::io::stdout().flush();
            }
        }));
    }

    fn on_menu(&mut self, menu: &Menu) {
        if let Ok(mut shared) = self.menu.lock() {
            *shared = menu.clone();
        }
        print!("\n{}", render_menu(menu));
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregatedResult, HeadlineRecord, SourceId};

    mod command_tests {
        use super::*;

        #[test]
        fn test_parse_simple_commands() {
            assert_eq!(Command::parse("r"), Some(Command::Refresh));
            assert_eq!(Command::parse("  quit "), Some(Command::Quit));
            assert_eq!(Command::parse("m"), Some(Command::Menu));
            assert_eq!(Command::parse("?"), Some(Command::Help));
        }

        #[test]
        fn test_parse_open_with_number() {
            assert_eq!(Command::parse("o 3"), Some(Command::Open(3)));
            assert_eq!(Command::parse("open 12"), Some(Command::Open(12)));
        }

        #[test]
        fn test_parse_rejects_bad_input() {
            assert_eq!(Command::parse(""), None);
            assert_eq!(Command::parse("o"), None);
            assert_eq!(Command::parse("o x"), None);
            assert_eq!(Command::parse("launch"), None);
        }
    }

    mod render_menu_tests {
        use super::*;

        #[test]
        fn test_render_loading_menu() {
            let text = render_menu(&Menu::loading());
            assert!(text.starts_with("Loading headlines...\n"));
            assert!(text.contains("[r] Refresh Now"));
            assert!(text.contains("[q] Quit NewsBar"));
        }

        #[test]
        fn test_render_numbers_entries_across_sections() {
            let result = AggregatedResult::new(vec![
                HeadlineRecord::new("World news", "https://bbc.example.com/1", SourceId::Bbc)
                    .unwrap(),
                HeadlineRecord::new(
                    "Show HN: a thing",
                    "https://hn.example.com/2",
                    SourceId::HackerNews,
                )
                .unwrap(),
            ]);

            let text = render_menu(&Menu::from_result(&result));

            assert!(text.contains("== BBC News ==\n  1. World news\n"));
            assert!(text.contains("== Hacker News ==\n  2. Show HN: a thing\n"));
            assert!(text.contains("(Updated "));
            assert!(!text.contains("Loading"));
        }
    }
}
