//! Opening-book tooling on top of [`flipbook_othello`]: a shallow
//! alpha-beta searcher, game records, and a validated book of best
//! replies keyed by canonical position ID.

pub mod book;
pub mod bot;
pub mod game;
pub mod store;

pub use book::{BookError, CheckOutcome, OpeningBook, Violation};
pub use bot::{Bot, NoMovesError};
pub use game::{Game, UnknownPlayer};
pub use store::{BookData, BookStore, JsonStore, MemoryStore, Opening, StoreError};
