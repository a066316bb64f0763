use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};

/// Element tree built from a layout document.
///
/// Names are stored without namespace prefix. Repeated and single children are
/// the same thing here: every lookup returns a sequence, so callers never branch
/// on whether a field held one structure or a list of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse `xml` into its root element. `Ok(None)` when the input holds no element.
    pub fn parse(xml: &str) -> quick_xml::Result<Option<Element>> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => stack.push(open(&e)?),
                Event::Empty(e) => {
                    let el = open(&e)?;
                    attach(&mut stack, &mut root, el);
                }
                Event::Text(e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(_) => {
                    if let Some(el) = stack.pop() {
                        attach(&mut stack, &mut root, el);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(unclosed) = stack.pop() {
            return Err(IllFormedError::MissingEndTag(unclosed.name).into());
        }
        Ok(root)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow the first matching child at each step of `path`.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn open(e: &BytesStart) -> quick_xml::Result<Element> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attributes,
        ..Default::default()
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}
