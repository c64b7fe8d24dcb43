//! Markup sanitization for user-supplied text.
//!
//! Post titles, bodies, descriptions and comment bodies arrive from a rich
//! text editor and may contain HTML. Everything active (scripts, event
//! handlers, dangerous URLs) is stripped before the text is validated or
//! persisted; benign formatting tags survive.

/// Strip active markup, keeping safe formatting.
pub fn clean(input: &str) -> String {
    ammonia::clean(input)
}
