//! room-resolver: free-form destination phrases to waypoint node ids
//!
//! Maps spoken or typed room phrases ("room twelve", "washroom", "finve")
//! onto graph node ids through normalization, spelled-number conversion,
//! and approximate label matching. Resolution is best-effort by contract:
//! a phrase nothing matches yields `None`, and the caller re-prompts.

mod index;
pub use index::{load_room_index, RoomIndex};

mod numbers;
pub use numbers::{digit_in_phrase, word_to_digit};

mod resolver;
pub use resolver::{normalize, similarity, ResolvedRoom, Resolver, ResolverConfig};
