//! Small helpers over `scraper` shared by every document parser.

use scraper::{ElementRef, Html, Selector};

/// Compile a selector literal.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!("invalid selector literal: {css}"))
}

/// Text content with each text node trimmed and empty nodes dropped.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .concat()
}

/// Text nodes that are direct children of `el`, trimmed and joined.
pub fn own_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .concat()
}

/// Direct child elements with one of the given tag names.
pub fn child_elements<'a>(el: ElementRef<'a>, tags: &[&str]) -> Vec<ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| tags.contains(&child.value().name()))
        .collect()
}

/// Header and data cells of a row, in document order.
pub fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(row, &["th", "td"])
}

pub fn data_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(row, &["td"])
}

pub fn header_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(row, &["th"])
}

/// Rows of the table body; falls back to all rows when the table has no tbody.
pub fn body_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let tbody = child_elements(table, &["tbody"]);
    if tbody.is_empty() {
        return child_elements(table, &["tr"]);
    }
    tbody
        .into_iter()
        .flat_map(|body| child_elements(body, &["tr"]))
        .collect()
}

/// Rows of the table head, if any.
pub fn head_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(table, &["thead"])
        .into_iter()
        .flat_map(|head| child_elements(head, &["tr"]))
        .collect()
}

/// First `<a>` descendant.
pub fn first_link(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.select(&crate::parser::LINK).next()
}

pub fn links(el: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    el.select(&crate::parser::LINK).collect()
}

pub fn href(el: ElementRef<'_>) -> &str {
    el.value().attr("href").unwrap_or("")
}

/// Name and href of the first link in `el`, or the cell text with no href.
pub fn link_or_text(el: ElementRef<'_>) -> (String, Option<String>) {
    match first_link(el) {
        Some(a) => (text_of(a), Some(href(a).to_string())),
        None => (text_of(el), None),
    }
}

/// Element with the given tag and exact `id` attribute.
pub fn find_by_id<'a>(doc: &'a Html, tag: &str, id: &str) -> Option<ElementRef<'a>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag && el.value().id() == Some(id))
}

/// Every element with the given tag, in document order.
pub fn elements_by_tag<'a>(
    doc: &'a Html,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

/// Cell span, defaulting to 1.
pub fn colspan(el: ElementRef<'_>) -> u32 {
    el.value()
        .attr("colspan")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_of_trims_each_fragment() {
        let doc = Html::parse_fragment("<p> Mohamed <b> Salah </b> - 9 </p>");
        let p = doc.select(&selector("p")).next().unwrap();
        assert_eq!(text_of(p), "MohamedSalah- 9");
    }

    #[test]
    fn test_own_text_ignores_nested_elements() {
        let doc = Html::parse_fragment(r#"<span class="f-i"><span>eng</span> ENG</span>"#);
        let span = doc.select(&selector("span.f-i")).next().unwrap();
        assert_eq!(own_text(span), "ENG");
    }

    #[test]
    fn test_body_rows_and_cells() {
        let doc = Html::parse_document(
            "<table id='t'><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><th>1</th><td>x</td></tr><tr><td>2</td><td>y</td></tr></tbody></table>",
        );
        let table = find_by_id(&doc, "table", "t").unwrap();
        let rows = body_rows(table);
        assert_eq!(rows.len(), 2);
        assert_eq!(row_cells(rows[0]).len(), 2);
        assert_eq!(data_cells(rows[0]).len(), 1);
        assert_eq!(head_rows(table).len(), 1);
    }

    #[test]
    fn test_rows_without_explicit_tbody() {
        let doc = Html::parse_document("<table id='t'><tr><td>1</td></tr></table>");
        let table = find_by_id(&doc, "table", "t").unwrap();
        assert_eq!(body_rows(table).len(), 1);
    }

    #[test]
    fn test_link_or_text() {
        let doc = Html::parse_fragment(
            r#"<table><tr><td><a href="/en/squads/822bd0ba/Liverpool-Stats">Liverpool</a></td><td>Bye</td></tr></table>"#,
        );
        let cells: Vec<_> = doc.select(&selector("td")).collect();
        assert_eq!(
            link_or_text(cells[0]),
            (
                "Liverpool".to_string(),
                Some("/en/squads/822bd0ba/Liverpool-Stats".to_string())
            )
        );
        assert_eq!(link_or_text(cells[1]), ("Bye".to_string(), None));
    }
}
