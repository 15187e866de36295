#![forbid(unsafe_code)]

pub mod crossref;
pub mod layers;
pub mod layout;
pub mod model;
pub mod pattern;
pub mod scene;
pub mod selection;
pub mod view;
