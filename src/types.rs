//! Basic type definitions for the chat server
//!
//! Provides the `ConnectionId` newtype and the display name bound.

/// Name field size; stored names hold at most `NAME_LEN - 1` bytes.
pub const NAME_LEN: usize = 32;

/// Unique connection handle (newtype pattern)
///
/// Allocated sequentially by the server and stable for the lifetime of
/// the connection. Never reused within one server run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    /// Placeholder display name derived from the handle, e.g. `User4`
    pub fn placeholder_name(self) -> String {
        format!("User{}", self.0)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncate a requested display name to the name bound
///
/// Cuts on a char boundary so the result is always valid UTF-8.
pub fn bounded_name(name: &str) -> String {
    let max = NAME_LEN - 1;
    if name.len() <= max {
        return name.to_string();
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}
