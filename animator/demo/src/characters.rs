//! Built-in demo characters
//!
//! Two hand-drawn sprites registered into an explicit registry: `sprout`
//! (6x3, regular) and `mote` (3x1, micro). Both cover every state the
//! default alias table points at.

use animator_core::character::{CharacterDefinition, CharacterError, CharacterRegistry, Frame};

/// Character animated when none is given on the command line
pub const DEFAULT_CHARACTER: &str = "sprout";

const SPROUT_TOP: &str = " ▄██▄ ";
const SPROUT_BOTTOM: &str = " ▝▀▀▘ ";

fn sprout_frame(top: &str, middle: &str, bottom: &str) -> Frame {
    Frame::new([top, middle, bottom])
}

fn sprout_face(middle: &str) -> Frame {
    sprout_frame(SPROUT_TOP, middle, SPROUT_BOTTOM)
}

fn sprout() -> CharacterDefinition {
    CharacterDefinition::new("sprout", 6, 3)
        .with_color("#7FD17F")
        .with_base_frame(sprout_face("▐▘▀▀▝▌"))
        .with_state(
            "resting",
            vec![sprout_face("▐▘▀▀▝▌"), sprout_face("▐▝▀▀▘▌")],
        )
        .with_state(
            "write",
            vec![
                sprout_frame(SPROUT_TOP, "▐▛▀▀▜▌", " ▝▀▀▘▖"),
                sprout_frame(SPROUT_TOP, "▐▛▀▀▜▌", " ▝▀▀▘▗"),
                sprout_frame(SPROUT_TOP, "▐▙▄▄▟▌", " ▝▀▀▘▘"),
            ],
        )
        .with_state(
            "read",
            vec![
                sprout_frame("▗▄██▄ ", "▐▘▀▀▝▌", SPROUT_BOTTOM),
                sprout_frame(" ▄██▄▖", "▐▘▀▀▝▌", SPROUT_BOTTOM),
            ],
        )
        .with_state(
            "search",
            vec![
                sprout_face("▐█▘▝ ▌"),
                sprout_face("▐ █▝ ▌"),
                sprout_face("▐ ▘█ ▌"),
                sprout_face("▐ ▘▝█▌"),
            ],
        )
        .with_state(
            "approval",
            vec![
                sprout_frame("▗▄██▄▖", "▐▝▄▄▘▌", SPROUT_BOTTOM),
                sprout_frame(SPROUT_TOP, "▐▝▄▄▘▌", SPROUT_BOTTOM),
            ],
        )
        .with_state(
            "wait",
            vec![sprout_face("▐▀▀▀▀▌"), sprout_face("▐▄▄▄▄▌")],
        )
        .with_state(
            "arise",
            vec![
                sprout_frame("      ", "      ", " ▄▄▄▄ "),
                sprout_frame("      ", SPROUT_TOP, "▐▀▀▀▀▌"),
                sprout_face("▐▘▀▀▝▌"),
            ],
        )
}

fn mote() -> CharacterDefinition {
    let one = |line: &str| Frame::new([line]);
    CharacterDefinition::new("mote", 3, 1)
        .with_color("#FFB347")
        .with_base_frame(one("▗█▖"))
        .with_state("resting", vec![one("▗█▖"), one("▗▆▖")])
        .with_state("think", vec![one("▐▀▌"), one("▐▄▌")])
        .with_state("write", vec![one("▐▛▌"), one("▐▜▌"), one("▐▙▌")])
        .with_state("read", vec![one("▝█▖"), one("▗█▘")])
        .with_state("search", vec![one("█▖ "), one(" █ "), one(" ▗█")])
        .with_state("approval", vec![one("▝█▘"), one("▗█▖")])
        .with_state("wait", vec![one("▐▀▌")])
        .with_state("arise", vec![one(" ▖ "), one("▗█▖")])
}

/// Registry holding every built-in character
///
/// # Errors
///
/// Returns a [`CharacterError`] if a built-in definition is malformed.
pub fn builtin_registry() -> Result<CharacterRegistry, CharacterError> {
    let registry = CharacterRegistry::new();
    registry.register(sprout())?;
    registry.register_micro(mote())?;
    Ok(registry)
}
