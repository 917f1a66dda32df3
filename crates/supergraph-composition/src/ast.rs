//! An owned, immutable GraphQL type system document.
//!
//! Documents are produced by [parse()], transformed into new documents by [visit()] and rendered
//! back to SDL through their [Display](std::fmt::Display) implementations. Printing is a fixed
//! point of parsing: `parse(&document.to_string())` is structurally equal to `document`.

mod nodes;
mod parse;
mod print;
mod visit;

pub use self::{
    nodes::*,
    parse::{parse, SyntaxError},
    visit::{visit, Action, StripDirectives, Transform},
};
