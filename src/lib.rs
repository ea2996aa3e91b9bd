//! Keyword Bot: suggests search keywords for a business by expanding its
//! industry and objective through a synonym dictionary and keeping the
//! candidates that appear on its website.

pub mod channels;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod fetch;
pub mod keywords;
pub mod lexicon;
