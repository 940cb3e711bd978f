use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::descriptor::{Descriptor, JNLP_SPEC_VERSION, ResourceEntry, ResourceGroup};
use crate::error::{JnlpError, Result};

const INDENT: usize = 3;

type XmlWriter = Writer<Vec<u8>>;
type XmlResult = std::result::Result<(), quick_xml::Error>;

/// Serializes `descriptor` as an indented JNLP document.
pub fn render(descriptor: &Descriptor) -> std::result::Result<String, quick_xml::Error> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    let standalone = descriptor.standalone.then_some("yes");
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), standalone)))?;

    let mut root = BytesStart::new("jnlp");
    root.push_attribute(("spec", JNLP_SPEC_VERSION));
    root.push_attribute(("codebase", descriptor.codebase.as_str()));
    w.write_event(Event::Start(root))?;

    w.write_event(Event::Start(BytesStart::new("information")))?;
    text_element(&mut w, "title", &descriptor.information.title)?;
    text_element(&mut w, "vendor", &descriptor.information.vendor)?;
    if descriptor.information.offline_allowed {
        w.write_event(Event::Empty(BytesStart::new("offline-allowed")))?;
    }
    w.write_event(Event::End(BytesEnd::new("information")))?;

    w.write_event(Event::Start(BytesStart::new("security")))?;
    w.write_event(Event::Empty(BytesStart::new("all-permissions")))?;
    w.write_event(Event::End(BytesEnd::new("security")))?;

    w.write_event(Event::Empty(BytesStart::new("component-desc")))?;

    w.write_event(Event::Start(BytesStart::new("resources")))?;
    let mut j2se = BytesStart::new("j2se");
    j2se.push_attribute(("version", descriptor.java_version.as_str()));
    w.write_event(Event::Empty(j2se))?;
    w.write_event(Event::End(BytesEnd::new("resources")))?;

    resource_group(&mut w, &descriptor.default_resources)?;
    for group in &descriptor.platform_resources {
        resource_group(&mut w, group)?;
    }

    w.write_event(Event::End(BytesEnd::new("jnlp")))?;

    let mut out = String::from_utf8_lossy(&w.into_inner()).into_owned();
    out.push('\n');
    Ok(out)
}

fn text_element(w: &mut XmlWriter, name: &str, text: &str) -> XmlResult {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))
}

fn resource_group(w: &mut XmlWriter, group: &ResourceGroup) -> XmlResult {
    let mut start = BytesStart::new("resources");
    if let Some(os) = &group.os {
        start.push_attribute(("os", os.as_str()));
    }
    if let Some(arch) = &group.arch {
        start.push_attribute(("arch", arch.as_str()));
    }

    if group.entries.is_empty() {
        return w.write_event(Event::Empty(start));
    }

    w.write_event(Event::Start(start))?;
    for entry in &group.entries {
        let (name, href) = match entry {
            ResourceEntry::Jar { href } => ("jar", href),
            ResourceEntry::Extension { href } => ("extension", href),
        };
        let mut el = BytesStart::new(name);
        el.push_attribute(("href", href.as_str()));
        w.write_event(Event::Empty(el))?;
    }
    w.write_event(Event::End(BytesEnd::new("resources")))
}

pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Renders and writes `descriptor` to `path`, returning the content hash.
pub fn write_descriptor(descriptor: &Descriptor, path: &Path) -> Result<String> {
    let content = render(descriptor).map_err(|source| JnlpError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, &content).map_err(|source| JnlpError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(hash_content(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Information;
    use quick_xml::Reader;

    fn descriptor() -> Descriptor {
        Descriptor {
            codebase: "http://example.org/site".to_string(),
            standalone: false,
            information: Information {
                title: "Demo <beta>".to_string(),
                vendor: "ACME & Sons".to_string(),
                offline_allowed: true,
            },
            java_version: "1.6+".to_string(),
            default_resources: ResourceGroup::default(),
            platform_resources: vec![ResourceGroup {
                os: Some("Windows".to_string()),
                arch: Some("x86_64".to_string()),
                entries: vec![ResourceEntry::Jar {
                    href: "plugins/swt_1.0.0.jar".to_string(),
                }],
            }],
        }
    }

    /// (depth, name, attributes) of every element in document order.
    fn elements(xml: &str) -> Vec<(usize, String, Vec<(String, String)>)> {
        let mut reader = Reader::from_str(xml);
        let mut out = Vec::new();
        let mut depth = 0;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    out.push((depth, name_of(&e), attrs_of(&e)));
                    depth += 1;
                }
                Event::Empty(e) => out.push((depth, name_of(&e), attrs_of(&e))),
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {}
            }
        }
        out
    }

    fn name_of(e: &BytesStart<'_>) -> String {
        String::from_utf8_lossy(e.name().as_ref()).into_owned()
    }

    fn attrs_of(e: &BytesStart<'_>) -> Vec<(String, String)> {
        e.attributes()
            .map(|a| {
                let a = a.unwrap();
                (
                    String::from_utf8_lossy(a.key.as_ref()).into_owned(),
                    a.unescape_value().unwrap().into_owned(),
                )
            })
            .collect()
    }

    #[test]
    fn renders_fixed_blocks_and_groups_in_order() {
        let xml = render(&descriptor()).unwrap();
        let top: Vec<_> = elements(&xml)
            .into_iter()
            .filter(|(d, _, _)| *d == 1)
            .map(|(_, n, a)| (n, a))
            .collect();

        let names: Vec<_> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["information", "security", "component-desc", "resources", "resources", "resources"]
        );
        assert!(top[4].1.is_empty());
        assert_eq!(
            top[5].1,
            vec![
                ("os".to_string(), "Windows".to_string()),
                ("arch".to_string(), "x86_64".to_string())
            ]
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let xml = render(&descriptor()).unwrap();
        assert!(xml.contains("Demo &lt;beta&gt;"));
        assert!(xml.contains("ACME &amp; Sons"));
        let all = elements(&xml);
        assert_eq!(all[0].1, "jnlp");
        assert!(all[0].2.contains(&("spec".to_string(), "1.0+".to_string())));
        assert!(all.iter().any(|(_, n, _)| n == "all-permissions"));
    }

    #[test]
    fn standalone_flag_is_declared() {
        let mut d = descriptor();
        assert!(!render(&d).unwrap().contains("standalone"));
        d.standalone = true;
        assert!(render(&d).unwrap().contains(r#"standalone="yes""#));
    }

    #[test]
    fn write_descriptor_reports_hash_of_written_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.jnlp");
        let hash = write_descriptor(&descriptor(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(hash, hash_content(&written));
    }
}
