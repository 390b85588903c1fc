//! Filter state management: the cascade reducer, the URL codec and the
//! draft/applied controller built on both.

mod controller;
mod state;
pub mod url;

pub use controller::{Applied, FilterStateController, Phase};
pub use state::{reduce, FilterAction};
pub use url::{decode_url, encode_url, escape_segment, unescape_segment};
