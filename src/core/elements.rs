use crate::domain::model::SelectOption;
use crate::dom::{Document, NodeId};

/// Creates `<tag class="class_name">text</tag>`. An empty `tag` falls back to
/// `p`.
pub fn make_text_element(
    doc: &mut Document,
    tag: &str,
    text: &str,
    class_name: Option<&str>,
) -> NodeId {
    let tag = if tag.is_empty() { "p" } else { tag };
    let element = doc.create_element(tag);
    let text_node = doc.create_text(text);
    // a freshly created element always accepts a fresh text child
    let _ = doc.append(element, text_node);
    if let Some(class_name) = class_name.filter(|c| !c.is_empty()) {
        let _ = doc.add_class(element, class_name);
    }
    element
}

/// One `<option>` per record, in input order. `None` in, `None` out.
pub fn make_option_elements<T: SelectOption>(
    doc: &mut Document,
    records: Option<&[T]>,
) -> Option<Vec<NodeId>> {
    let records = records?;
    let options = records
        .iter()
        .map(|record| {
            let option = make_text_element(doc, "option", record.option_label(), None);
            let _ = doc.set_attr(option, "value", &record.option_value());
            option
        })
        .collect();
    Some(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Company, User};

    fn user(id: u64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            company: Company {
                name: "Acme".to_string(),
                catch_phrase: "We make things".to_string(),
            },
        }
    }

    #[test]
    fn test_make_text_element_with_class() {
        let mut doc = Document::new();
        let p = make_text_element(
            &mut doc,
            "p",
            "Select an Employee to display their posts.",
            Some("default-text"),
        );

        assert_eq!(doc.tag_name(p), Some("p"));
        assert_eq!(doc.text_content(p), "Select an Employee to display their posts.");
        assert!(doc.has_class(p, "default-text"));
        assert_eq!(doc.children(p).len(), 1);
    }

    #[test]
    fn test_make_text_element_defaults() {
        let mut doc = Document::new();
        let p = make_text_element(&mut doc, "", "", None);

        assert_eq!(doc.tag_name(p), Some("p"));
        assert_eq!(doc.text_content(p), "");
        assert!(doc.element(p).unwrap().classes().is_empty());
    }

    #[test]
    fn test_make_option_elements_preserves_order() {
        let mut doc = Document::new();
        let users = vec![user(1, "Bret"), user(2, "Julia")];

        let options = make_option_elements(&mut doc, Some(&users)).unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(doc.attr(options[0], "value"), Some("1"));
        assert_eq!(doc.text_content(options[0]), "Bret");
        assert_eq!(doc.attr(options[1], "value"), Some("2"));
        assert_eq!(doc.text_content(options[1]), "Julia");
        assert!(options.iter().all(|o| doc.tag_name(*o) == Some("option")));
    }

    #[test]
    fn test_make_option_elements_absent_input() {
        let mut doc = Document::new();
        assert!(make_option_elements::<User>(&mut doc, None).is_none());
        assert_eq!(
            make_option_elements::<User>(&mut doc, Some(&[])),
            Some(Vec::new())
        );
    }
}
