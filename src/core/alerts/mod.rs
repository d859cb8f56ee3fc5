// Alert matching: decides which alerts in a feed snapshot are worth showing.
//
// Architecture:
// - model.rs: Matcher configuration (credits tier, reward toggles) and rejection reasons
// - matcher.rs: The matching rule itself

pub mod matcher;
pub mod model;
