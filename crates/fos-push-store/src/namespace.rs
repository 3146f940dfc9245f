//! Store namespaces

/// A namespace within the push database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Device identity and worker versions, keyed by `key`
    Ids,
    /// Open events waiting for their page to load, keyed by `url`
    NotificationOpened,
    /// Host-provided display defaults, keyed by `key`
    Options,
}

impl Namespace {
    /// Every namespace in schema order
    pub const ALL: [Namespace; 3] = [
        Namespace::Ids,
        Namespace::NotificationOpened,
        Namespace::Options,
    ];

    /// Name used by the storage engine
    pub fn name(&self) -> &'static str {
        match self {
            Namespace::Ids => "Ids",
            Namespace::NotificationOpened => "NotificationOpened",
            Namespace::Options => "Options",
        }
    }

    /// Field of each record holding its primary key
    pub fn key_path(&self) -> &'static str {
        match self {
            Namespace::Ids | Namespace::Options => "key",
            Namespace::NotificationOpened => "url",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
