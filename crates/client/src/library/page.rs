//! Library detail page.

use scraper::Html;
use shelfmap_core::Error;

use super::{DEFAULT_HOURS, Library, element_text, selector};

/// Parse a detail page into a `Library`.
///
/// The heading is required. Address and phone are optional since some
/// locations list neither.
pub fn parse_library_page(html: &str) -> Result<Library, Error> {
    let document = Html::parse_document(html);

    let heading = selector("h1.css-1xx2irx-StyledHeading")?;
    let address = selector("address")?;
    let phone = selector("div.css-10ynnyg a.css-ilta09-StyledLink")?;

    let name = document
        .select(&heading)
        .next()
        .and_then(element_text)
        .ok_or_else(|| Error::ParseFailed("library name heading not found".into()))?;

    let location = document.select(&address).next().and_then(element_text);
    let phone = document.select(&phone).next().and_then(element_text);

    Ok(Library { name, location, hours: DEFAULT_HOURS.to_string(), phone })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_full() {
        let html = r#"
            <main>
                <h1 class="css-1xx2irx-StyledHeading e1tlxttt0">Shapiro Library</h1>
                <address>
                    919 S. University Ave.
                    Ann Arbor, MI 48109-1185
                </address>
                <div class="css-10ynnyg">
                    <a class="css-ilta09-StyledLink e2b8o640" href="mailto:ask@umich.edu">(734) 764-7490</a>
                </div>
            </main>
        "#;

        let library = parse_library_page(html).unwrap();

        assert_eq!(library.name, "Shapiro Library");
        assert_eq!(library.location.as_deref(), Some("919 S. University Ave. Ann Arbor, MI 48109-1185"));
        assert_eq!(library.phone.as_deref(), Some("(734) 764-7490"));
        assert_eq!(library.hours, DEFAULT_HOURS);
    }

    #[test]
    fn test_parse_page_missing_name() {
        let html = r#"<h1 class="other">Shapiro Library</h1><address>somewhere</address>"#;
        assert!(matches!(parse_library_page(html), Err(Error::ParseFailed(_))));
    }

    #[test]
    fn test_parse_page_blank_name() {
        let html = r#"<h1 class="css-1xx2irx-StyledHeading">   </h1>"#;
        assert!(matches!(parse_library_page(html), Err(Error::ParseFailed(_))));
    }

    #[test]
    fn test_parse_page_optional_fields_missing() {
        let html = r#"<h1 class="css-1xx2irx-StyledHeading">Annex</h1>"#;

        let library = parse_library_page(html).unwrap();
        assert_eq!(library.name, "Annex");
        assert_eq!(library.location, None);
        assert_eq!(library.phone, None);
    }

    #[test]
    fn test_parse_page_phone_outside_contact_block_ignored() {
        let html = r#"
            <h1 class="css-1xx2irx-StyledHeading">Annex</h1>
            <a class="css-ilta09-StyledLink">Not a phone</a>
        "#;

        let library = parse_library_page(html).unwrap();
        assert_eq!(library.phone, None);
    }
}
