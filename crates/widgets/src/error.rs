use thiserror::Error;

/// Structural configuration problems. Any of these is fatal to mounting:
/// the widget renders an inline error box instead of a partial tab group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a tab group requires at least one tab")]
    EmptyTabs,

    #[error("duplicate tab value \"{0}\": every value must be unique within its group")]
    DuplicateValue(String),

    #[error("more than one tab is marked as the default")]
    MultipleDefaults,

    #[error("default value \"{requested}\" matches none of the tabs; available values: {available}")]
    UnknownDefault { requested: String, available: String },

    #[error("query-string sync needs an explicit parameter name or a group id to derive one from")]
    UnresolvedQueryParam,
}

/// `select` was called with a value that matches no tab in the group.
/// Recoverable: the caller may ignore it or fall back to the first tab.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot select invalid tab value \"{requested}\"")]
pub struct InvalidSelection {
    pub requested: String,
}

/// Failure of a persistence side channel (localStorage, history API).
/// Always swallowed at the select boundary; selection itself never fails
/// because of one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SideChannelError(pub String);
