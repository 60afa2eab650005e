//! Output document model.
//!
//! This module defines the intermediate representation between
//! classification and persistence: an append-only sequence of
//! [`Element`]s plus the fixed [`PageLayout`] of the rendered document.

mod builder;
mod element;
mod output;

pub use builder::DocumentBuilder;
pub use element::Element;
pub use output::{OutputDocument, PageLayout, TWIPS_PER_INCH};
