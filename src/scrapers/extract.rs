use scraper::{Html, Selector};
use tracing::debug;

use crate::models::ScrapedFields;

/// Text of every `<p>` inside `ul > li` items of the public records section,
/// in document order. Whitespace inside a paragraph is collapsed the way the
/// browser renders it.
pub fn public_record_texts(html: &str) -> ScrapedFields {
    let document = Html::parse_fragment(html);
    let paragraph_selector = Selector::parse("ul > li > p").unwrap();

    let texts: Vec<String> = document
        .select(&paragraph_selector)
        .map(|p| {
            p.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    debug!("Extracted {} public record strings", texts.len());
    ScrapedFields::new(texts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: &str = r#"
        <div class="records">
          <div><div><div>
            <ul>
              <li><p>Zoning</p><p>R5</p></li>
              <li><p>Lot  Size</p><p>2,500
                 sqft</p></li>
              <li><p>Year Built</p><p><span>1931</span></p></li>
            </ul>
          </div></div></div>
          <p>Data provided by county records</p>
        </div>
    "#;

    #[test]
    fn extracts_label_value_paragraphs_in_order() {
        let fields = public_record_texts(SECTION);

        assert_eq!(
            fields.as_slice(),
            &["Zoning", "R5", "Lot Size", "2,500 sqft", "Year Built", "1931"]
        );
    }

    #[test]
    fn section_without_list_yields_nothing() {
        assert!(public_record_texts("<div><p>No public records</p></div>").is_empty());
    }

    #[test]
    fn empty_paragraph_is_kept_as_empty_value() {
        let fields = public_record_texts("<ul><li><p>HOA</p><p></p></li></ul>");
        assert_eq!(fields.as_slice(), &["HOA", ""]);
    }
}
