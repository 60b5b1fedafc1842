use chrono::{DateTime, Local, Utc};
use reqwest::Url;

use crate::models::{AggregatedResult, SourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    RefreshNow,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 2] = [MenuAction::RefreshNow, MenuAction::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::RefreshNow => "Refresh Now",
            MenuAction::Quit => "Quit NewsBar",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            MenuAction::RefreshNow => 'r',
            MenuAction::Quit => 'q',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub source: SourceId,
    pub entries: Vec<MenuEntry>,
}

/// Menu contents as plain data; the rendering surface builds the widgets.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    sections: Vec<MenuSection>,
    updated_at: Option<DateTime<Utc>>,
}

impl Menu {
    pub const LOADING_LABEL: &'static str = "Loading headlines...";

    /// Placeholder shown before the first refresh completes.
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn from_result(result: &AggregatedResult) -> Self {
        let sections = SourceId::ALL
            .iter()
            .filter_map(|&source| {
                let entries: Vec<MenuEntry> = result
                    .headlines
                    .iter()
                    .filter(|h| h.source() == source)
                    .map(|h| MenuEntry {
                        label: h.title().to_string(),
                        url: h.url().clone(),
                    })
                    .collect();
                (!entries.is_empty()).then_some(MenuSection { source, entries })
            })
            .collect();

        Self {
            sections,
            updated_at: Some(result.completed_at),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.updated_at.is_none()
    }

    pub fn sections(&self) -> &[MenuSection] {
        &self.sections
    }

    pub fn actions(&self) -> &'static [MenuAction] {
        &MenuAction::ALL
    }

    /// Headline entries numbered from 1 across all sections.
    pub fn entry(&self, number: usize) -> Option<&MenuEntry> {
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter())
            .nth(number.checked_sub(1)?)
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn updated_label(&self) -> Option<String> {
        self.updated_at.map(|ts| {
            let local: DateTime<Local> = ts.into();
            format!("Updated {}", local.format("%H:%M"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeadlineRecord;

    fn record(title: &str, source: SourceId) -> HeadlineRecord {
        let slug = title.replace(' ', "-");
        HeadlineRecord::new(title, &format!("https://example.com/{}", slug), source).unwrap()
    }

    #[test]
    fn test_loading_menu() {
        let menu = Menu::loading();
        assert!(menu.is_loading());
        assert!(menu.sections().is_empty());
        assert!(menu.updated_label().is_none());
        assert_eq!(menu.actions(), &[MenuAction::RefreshNow, MenuAction::Quit]);
    }

    #[test]
    fn test_sections_follow_source_order() {
        let result = AggregatedResult::new(vec![
            record("bbc one", SourceId::Bbc),
            record("bbc two", SourceId::Bbc),
            record("hn one", SourceId::HackerNews),
        ]);

        let menu = Menu::from_result(&result);

        assert!(!menu.is_loading());
        assert_eq!(menu.sections().len(), 2);
        assert_eq!(menu.sections()[0].source, SourceId::Bbc);
        assert_eq!(menu.sections()[0].entries.len(), 2);
        assert_eq!(menu.sections()[1].source, SourceId::HackerNews);
        assert_eq!(
            menu.sections()[1].entries[0].url.as_str(),
            "https://example.com/hn-one"
        );
    }

    #[test]
    fn test_sources_without_headlines_are_omitted() {
        let result = AggregatedResult::new(vec![record("hn only", SourceId::HackerNews)]);

        let menu = Menu::from_result(&result);

        assert_eq!(menu.sections().len(), 1);
        assert_eq!(menu.sections()[0].source, SourceId::HackerNews);
    }

    #[test]
    fn test_empty_result_is_not_loading() {
        let menu = Menu::from_result(&AggregatedResult::new(Vec::new()));
        assert!(!menu.is_loading());
        assert_eq!(menu.entry_count(), 0);
        assert!(menu.updated_label().unwrap().starts_with("Updated "));
    }

    #[test]
    fn test_entry_numbering_spans_sections() {
        let result = AggregatedResult::new(vec![
            record("first", SourceId::Bbc),
            record("second", SourceId::HackerNews),
        ]);
        let menu = Menu::from_result(&result);

        assert!(menu.entry(0).is_none());
        assert_eq!(menu.entry(1).unwrap().label, "first");
        assert_eq!(menu.entry(2).unwrap().label, "second");
        assert!(menu.entry(3).is_none());
        assert_eq!(menu.entry_count(), 2);
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(MenuAction::RefreshNow.label(), "Refresh Now");
        assert_eq!(MenuAction::Quit.shortcut(), 'q');
    }
}
