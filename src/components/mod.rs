//! UI components.

pub mod radial_tree;
