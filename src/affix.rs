// Copyright (C) Brian G. Milnes 2025

//! Affix derivation: enum type name to the value prefix the naming rule expects
//!
//! Examples:
//! - ControlCommand -> CONTROL_COMMAND_
//! - CapabilityType -> CAPABILITY_TYPE_
//! - Intent -> INTENT_

pub mod affix {
    /// Separator between words in enum value names
    pub const SEPARATOR: char = '_';

    /// Token appended to the derived prefix for the zero value
    pub const UNSPECIFIED: &str = "UNSPECIFIED";

    /// Convert a PascalCase name to its SCREAMING_SNAKE_CASE value prefix.
    ///
    /// A separator goes before every uppercase letter except the first
    /// character, so acronyms split per letter (`HTTPMethod` -> `H_T_T_P_METHOD_`).
    pub fn derive_prefix(enum_name: &str) -> String {
        let mut snake = String::with_capacity(enum_name.len() + 8);
        for (i, c) in enum_name.chars().enumerate() {
            if i > 0 && c.is_uppercase() {
                snake.push(SEPARATOR);
            }
            snake.push(c);
        }
        let mut prefix = snake.to_uppercase();
        prefix.push(SEPARATOR);
        prefix
    }

    /// The name the zero value of `enum_name` must carry, e.g. `INTENT_UNSPECIFIED`
    pub fn zero_value_name(enum_name: &str) -> String {
        format!("{}{}", derive_prefix(enum_name), UNSPECIFIED)
    }

    /// Split a SCREAMING_SNAKE_CASE identifier into its words.
    /// Empty segments from doubled or trailing separators are dropped.
    pub fn words(identifier: &str) -> Vec<&str> {
        identifier.split(SEPARATOR).filter(|w| !w.is_empty()).collect()
    }
}
