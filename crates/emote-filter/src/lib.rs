//! Emoticon notation filter for rendered wiki HTML.
//!
//! Runs after markup has been converted to HTML and rewrites short notations
//! into image tags:
//!
//! - `{:)}` becomes `<img src='smile.png'/>` using a notation-to-image
//!   mapping file
//! - `[{:)}]` becomes the literal text `{:)}`
//!
//! # Architecture
//!
//! - [`notation`]: the notation grammar and the plain/escaped matcher
//! - [`MappingTable`]: the parsed mapping file, with [`MappingStore`] caching
//!   it until an explicit reload
//! - [`translate`] and [`unescape`]: the two rewriting stages, always run in
//!   that order
//! - [`EmoticonsPlugin`]: the [`TextPlugin`] a wiki host calls
//!
//! # Example
//!
//! ```
//! use emote_filter::{EmoticonsPlugin, MappingStore, MappingTable};
//!
//! let table = MappingTable::from_entries([(":)", "smile.png"), ("(*r)", "rose.png")]).unwrap();
//! let plugin = EmoticonsPlugin::new(MappingStore::from_table(table));
//!
//! let out = plugin.render("Hello {:)} world [{:)}] done {(*r)}");
//! assert_eq!(
//!     out.html,
//!     "Hello <img src='smile.png'/> world {:)} done <img src='rose.png'/>"
//! );
//! ```

mod error;
mod mapping;
pub mod notation;
mod plugin;
mod store;
mod translate;

pub use error::{LookupError, MappingError};
pub use mapping::{MappingEntry, MappingTable};
pub use notation::{NotationKind, NotationMatch};
pub use plugin::{EmoticonsPlugin, FilterOutput, TextPlugin};
pub use store::MappingStore;
pub use translate::{Translation, Unescaped, image_tag, translate, unescape};
