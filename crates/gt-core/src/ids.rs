//! Typed identifiers for road nodes and sessions.
//!
//! Each id is a `Copy` newtype over an integer, ordered and hashable, so it
//! can key maps and sort without ceremony.  [`NodeId`] is dense and indexes
//! the road graph's arrays; [`RawId`] is whatever the ingestion source
//! called the node and is what callers see.

use std::fmt;

/// Declare an id newtype.  `prefix` is used by `Display`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "not assigned".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The id as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Dense index of a routable road node, assigned in insertion order when
    /// the graph is built.  Only meaningful for the graph that produced it.
    pub struct NodeId(u32) => "node#";
}

typed_id! {
    /// Node id as supplied by the ingestion source (e.g. an OSM node id).
    pub struct RawId(u64) => "raw#";
}

typed_id! {
    /// One client's route slot in the service.
    pub struct SessionId(u64) => "session#";
}
