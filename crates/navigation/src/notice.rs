/// User-facing, dismissible messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidSearch { query: String },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::InvalidSearch { query } if query.is_empty() => {
                "Please pick a campus from the list.".to_string()
            }
            Notice::InvalidSearch { query } => {
                format!("No campus named \"{query}\". Please pick one from the list.")
            }
        }
    }
}

/// Holds at most one notice; raising replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
    raised: u64,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, notice: Notice) {
        self.current = Some(notice);
        self.raised += 1;
    }

    /// Returns the dismissed notice, if any.
    pub fn dismiss(&mut self) -> Option<Notice> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Total notices raised, dismissed or not.
    pub fn raised(&self) -> u64 {
        self.raised
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeBoard};

    #[test]
    fn raise_replaces_and_counts() {
        let mut board = NoticeBoard::new();
        board.raise(Notice::InvalidSearch { query: "x".into() });
        board.raise(Notice::InvalidSearch { query: "y".into() });
        assert_eq!(board.raised(), 2);
        assert_eq!(
            board.dismiss(),
            Some(Notice::InvalidSearch { query: "y".into() })
        );
        assert_eq!(board.current(), None);
        assert_eq!(board.dismiss(), None);
    }

    #[test]
    fn message_mentions_query() {
        let n = Notice::InvalidSearch { query: "Foo".into() };
        assert!(n.message().contains("\"Foo\""));
        let empty = Notice::InvalidSearch { query: String::new() };
        assert_eq!(empty.message(), "Please pick a campus from the list.");
    }
}
