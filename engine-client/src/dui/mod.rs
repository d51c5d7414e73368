//! DUI (Diplomacy Universal Interface) protocol handling: a line-oriented
//! handshake and command set for driving an engine subprocess. `dfen`
//! encodes a board position; `dson` encodes/decodes order lists. Both are
//! adapted to this crate's opaque province identifiers — there is no
//! coast grammar here, since the 75-province map is out of scope.

pub mod command;
pub mod dfen;
pub mod dson;
pub mod reply;

pub use command::Command;
pub use reply::Reply;
