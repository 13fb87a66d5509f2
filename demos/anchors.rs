//! Sharing values with anchors and references.
//!
//! Run with: cargo run --example anchors

use sigil_format::{compose_all, Parser, Tag};
use std::error::Error;
use std::rc::Rc;

const DOCUMENT: &str = r#"
{Style font "Inter" size =12} @body
{Style font "Inter" size =20} @heading

{Page
	title {Block style #heading text "Welcome"}
	intro {Block style #body text "Plain text, shared style."}
	outro {Block style #body text "Same style instance again."}
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let mut parser = Parser::from_str(DOCUMENT);

    // Skip straight to the page; the two styles stay buffered.
    let page = parser.parse_next_tagged(&Tag::composite("Page"))?;
    println!("Buffered while searching: {}", parser.buffered());

    let intro = page.get("intro").and_then(|b| b.get("style"));
    let outro = page.get("outro").and_then(|b| b.get("style"));
    if let (Some(intro), Some(outro)) = (intro, outro) {
        println!("intro and outro share one style: {}", Rc::ptr_eq(intro, outro));
    }

    let mut values = Vec::new();
    while parser.has_next()? {
        values.push(parser.parse_next()?);
    }
    values.push(page);

    // Shared values are written once and referenced afterwards.
    println!("\nComposed:\n{}", compose_all(&values)?);

    Ok(())
}
