//! Auth token purposes.

/// What an auth token is used for. Each purpose keeps its own cached token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Single,
    Bulk,
    Broadcast,
    Statistics,
}

impl TokenPurpose {
    /// Every purpose, in slot order.
    pub const ALL: [TokenPurpose; 4] = [
        TokenPurpose::Single,
        TokenPurpose::Bulk,
        TokenPurpose::Broadcast,
        TokenPurpose::Statistics,
    ];

    /// Stable slot index.
    pub fn index(self) -> usize {
        match self {
            TokenPurpose::Single => 0,
            TokenPurpose::Bulk => 1,
            TokenPurpose::Broadcast => 2,
            TokenPurpose::Statistics => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::Single => "single",
            TokenPurpose::Bulk => "bulk",
            TokenPurpose::Broadcast => "broadcast",
            TokenPurpose::Statistics => "statistics",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
