//! Last-seen message bookkeeping for fetch-since polling.

/// Tracks the id of the most recently consumed message.
///
/// The value is opaque: it is never compared or ordered, only replaced.
/// Because polls are strictly serialized, replacement is always "newest
/// wins" by construction.
#[derive(Debug, Clone, Default)]
pub struct Cursor(Option<String>);

impl Cursor {
    /// A cursor that has seen nothing; the first poll fetches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a consumed message's id, if it carried one. Messages without
    /// ids leave the cursor untouched.
    pub fn advance(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            self.0 = Some(id.to_owned());
        }
    }

    /// Value for the next request's `since_id` parameter.
    pub fn since_id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        assert_eq!(Cursor::new().since_id(), None);
    }

    #[test]
    fn advances_only_on_ids() {
        let mut cursor = Cursor::new();
        cursor.advance(Some("3"));
        cursor.advance(None);
        assert_eq!(cursor.since_id(), Some("3"));
        cursor.advance(Some("7"));
        assert_eq!(cursor.since_id(), Some("7"));
    }
}
