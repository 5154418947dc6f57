//! Status fetch options
//!
//! Each flag asks the remote side to attach an optional, more expensive field
//! to a status snapshot. The empty set is the cheapest fetch.

use bitflags::bitflags;

bitflags! {
    /// Set of optional data to include in a status fetch.
    ///
    /// ```
    /// use dagwatch_core::domain::options::StatusGetOpts;
    ///
    /// let opts = StatusGetOpts::GET_COUNTERS | StatusGetOpts::GET_MEMORY_USAGE;
    /// assert!(opts.contains(StatusGetOpts::GET_COUNTERS));
    /// assert!(!StatusGetOpts::empty().contains(StatusGetOpts::GET_COUNTERS));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusGetOpts: u8 {
        /// Attach counters to DAG and vertex status.
        const GET_COUNTERS     = 0b0000_0001;
        /// Attach application master memory usage to DAG status.
        const GET_MEMORY_USAGE = 0b0000_0010;
    }
}

impl StatusGetOpts {
    const WIRE_NAMES: [(StatusGetOpts, &'static str); 2] = [
        (StatusGetOpts::GET_COUNTERS, "counters"),
        (StatusGetOpts::GET_MEMORY_USAGE, "memory_usage"),
    ];

    /// Comma separated form used in request query strings, e.g. `counters,memory_usage`
    pub fn to_query_value(self) -> String {
        Self::WIRE_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the query form; unknown names are ignored
    pub fn from_query_value(value: &str) -> Self {
        value
            .split(',')
            .map(str::trim)
            .filter_map(|part| {
                Self::WIRE_NAMES
                    .iter()
                    .find(|(_, name)| *name == part)
                    .map(|(flag, _)| *flag)
            })
            .fold(Self::empty(), |acc, flag| acc | flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_cheapest() {
        let opts = StatusGetOpts::default();
        assert!(opts.is_empty());
        assert_eq!(opts.to_query_value(), "");
    }

    #[test]
    fn test_union_and_membership() {
        let opts = StatusGetOpts::GET_COUNTERS | StatusGetOpts::GET_COUNTERS;
        assert_eq!(opts, StatusGetOpts::GET_COUNTERS);

        let both = opts.union(StatusGetOpts::GET_MEMORY_USAGE);
        assert!(both.contains(StatusGetOpts::GET_COUNTERS));
        assert!(both.contains(StatusGetOpts::GET_MEMORY_USAGE));
        assert_eq!(both.to_query_value(), "counters,memory_usage");
    }

    #[test]
    fn test_query_value_parsing_ignores_unknown_names() {
        let opts = StatusGetOpts::from_query_value("memory_usage, bogus,counters");
        assert_eq!(
            opts,
            StatusGetOpts::GET_COUNTERS | StatusGetOpts::GET_MEMORY_USAGE
        );
        assert_eq!(StatusGetOpts::from_query_value(""), StatusGetOpts::empty());
    }
}
