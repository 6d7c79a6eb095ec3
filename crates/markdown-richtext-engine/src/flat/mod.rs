//! # Flat Rich Text
//!
//! [`RichTextAccumulator`] turns render events into a single markup string.
//! Text blocks arrive already marked up and are wrapped in the default text
//! style; indents become `<indent=Npx>` … `</indent>` pairs whose width grows
//! with depth; vertical space becomes `<br>`.
//!
//! ```text
//! begin_indent(None)        <indent=16px>
//! begin_indent(Some("• "))  • <indent=32px>
//! accept_text_block("a")    <color=…><size=14>a</size></color>
//! end_indent                </indent>
//! end_indent                </indent>
//! ```

mod accumulator;

pub use accumulator::RichTextAccumulator;
