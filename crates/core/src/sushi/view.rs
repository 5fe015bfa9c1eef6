use super::messages;
use super::types::{Sushi, SushiData};
use crate::cache::{EntrySnapshot, FetchStatus};

/// What a list consumer should render for a cache entry.
///
/// `Empty` is a distinct signal: a successful fetch that returned nothing
/// is neither loading nor an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Error {
        message: String,
        /// Last known good items, if any.
        stale: Option<Vec<Sushi>>,
    },
    Empty,
    Items(Vec<Sushi>),
}

impl ListView {
    /// Derives the view from a snapshot of a list entry.
    ///
    /// Entries that are loading but already hold data render that data
    /// while the refetch runs.
    pub fn from_snapshot(snapshot: &EntrySnapshot<SushiData>) -> Self {
        let items = snapshot
            .data
            .as_ref()
            .and_then(SushiData::as_list)
            .map(<[Sushi]>::to_vec);

        match (snapshot.status, items) {
            (FetchStatus::Error, stale) => ListView::Error {
                message: snapshot
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| messages::LOAD_ERROR_DEFAULT.to_string()),
                stale,
            },
            (_, Some(items)) if items.is_empty() => ListView::Empty,
            (_, Some(items)) => ListView::Items(items),
            (_, None) => ListView::Loading,
        }
    }

    pub fn items(&self) -> &[Sushi] {
        match self {
            ListView::Items(items) => items,
            ListView::Error {
                stale: Some(items), ..
            } => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListView::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{sushi_list_key, FetchError};
    use crate::filters::FilterState;
    use crate::sushi::SushiType;

    fn snapshot(status: FetchStatus, data: Option<Vec<Sushi>>) -> EntrySnapshot<SushiData> {
        EntrySnapshot {
            key: sushi_list_key(&FilterState::default()),
            status,
            data: data.map(SushiData::List),
            error: None,
            generation: 1,
            is_stale: false,
            subscriber_count: 1,
        }
    }

    fn item() -> Sushi {
        Sushi::new("a1", "Salmon Nigiri", SushiType::Nigiri, 4.5)
    }

    #[test]
    fn test_idle_and_loading_without_data() {
        assert!(ListView::from_snapshot(&snapshot(FetchStatus::Idle, None)).is_loading());
        assert!(ListView::from_snapshot(&snapshot(FetchStatus::Loading, None)).is_loading());
    }

    #[test]
    fn test_empty_is_distinct() {
        let view = ListView::from_snapshot(&snapshot(FetchStatus::Success, Some(vec![])));
        assert_eq!(view, ListView::Empty);
    }

    #[test]
    fn test_items() {
        let view = ListView::from_snapshot(&snapshot(FetchStatus::Success, Some(vec![item()])));
        assert_eq!(view.items().len(), 1);
    }

    #[test]
    fn test_loading_with_data_serves_stale_items() {
        let view = ListView::from_snapshot(&snapshot(FetchStatus::Loading, Some(vec![item()])));
        assert_eq!(view, ListView::Items(vec![item()]));
    }

    #[test]
    fn test_error_keeps_stale_items() {
        let mut snap = snapshot(FetchStatus::Error, Some(vec![item()]));
        snap.error = Some(FetchError::Network("offline".to_string()));

        let view = ListView::from_snapshot(&snap);

        assert_eq!(
            view,
            ListView::Error {
                message: "Network error: offline".to_string(),
                stale: Some(vec![item()]),
            }
        );
        assert_eq!(view.items().len(), 1);
    }

    #[test]
    fn test_error_without_message_uses_default() {
        let view = ListView::from_snapshot(&snapshot(FetchStatus::Error, None));
        assert_eq!(
            view,
            ListView::Error {
                message: messages::LOAD_ERROR_DEFAULT.to_string(),
                stale: None,
            }
        );
    }
}
