//! Reward catalogue view: which rewards to list, how large to draw them, and
//! the notify/ignore actions offered on each entry.

pub mod view;
pub mod zoom;
