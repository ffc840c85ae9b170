//! Body parsing for DOCX documents.
//!
//! Walks `word/document.xml` and turns every `w:p` into one or more text
//! lines. Runs are concatenated, tabs become spaces and breaks start a new
//! line. Office math is spelled as `$...$` so the cleanup pipeline can convert
//! it, and pictures become `\includegraphics{media/..}` commands.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Parses a document body into raw lines (not yet trimmed or filtered).
pub fn parse_body(xml: &str, rels: &HashMap<String, String>) -> Result<Vec<String>> {
    let mut parser = BodyParser::new(xml, rels);
    parser.parse()?;
    Ok(parser.lines)
}

/// Elements whose content never belongs to the reading order.
fn is_skipped(name: &str) -> bool {
    matches!(
        name,
        "txbxContent" | "Fallback" | "instrText" | "delText" | "rPr" | "pPr" | "sectPr"
    )
}

/// Body parser state machine.
struct BodyParser<'a> {
    reader: Reader<&'a [u8]>,
    rels: &'a HashMap<String, String>,
    lines: Vec<String>,
}

impl<'a> BodyParser<'a> {
    fn new(xml: &'a str, rels: &'a HashMap<String, String>) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        Self {
            reader,
            rels,
            lines: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<()> {
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = get_local_name(&e);
                    buf.clear();

                    if name == "p" {
                        self.parse_paragraph()?;
                    } else if is_skipped(&name) {
                        skip_element(&mut self.reader)?;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    /// Parses a `<w:p>` paragraph element.
    fn parse_paragraph(&mut self) -> Result<()> {
        let mut line = String::new();
        let mut buf = Vec::new();
        let mut depth = 1usize;

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = get_local_name(&e);
                    let image = self.image_reference(&e, &name);
                    buf.clear();

                    match name.as_str() {
                        "t" => line.push_str(&self.read_text("t")?),
                        "oMath" => {
                            let math = self.read_math("oMath")?;
                            if !math.trim().is_empty() {
                                line.push_str(&format!(" ${}$ ", math.trim()));
                            }
                        }
                        n if is_skipped(n) => skip_element(&mut self.reader)?,
                        _ => {
                            depth += 1;
                            if let Some(command) = image {
                                line.push_str(&command);
                            }
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let name = get_local_name(&e);
                    match name.as_str() {
                        "tab" => line.push(' '),
                        "br" | "cr" => self.lines.push(std::mem::take(&mut line)),
                        _ => {
                            if let Some(command) = self.image_reference(&e, &name) {
                                line.push_str(&command);
                            }
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        self.lines.push(line);
        Ok(())
    }

    /// Resolves `a:blip r:embed` / `v:imagedata r:id` to an include command.
    fn image_reference(&self, e: &BytesStart, name: &str) -> Option<String> {
        let id = match name {
            "blip" => get_attr_string(e, "embed"),
            "imagedata" => get_attr_string(e, "id"),
            _ => None,
        }?;
        let target = self.rels.get(&id)?;
        Some(format!(" \\includegraphics{{{}}} ", target))
    }

    /// Reads character data up to the end of the current element.
    fn read_text(&mut self, end: &str) -> Result<String> {
        let mut text = String::new();
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Text(t)) => {
                    let s = t.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    text.push_str(&s);
                }
                Ok(Event::CData(t)) => {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
                Ok(Event::Start(_)) => {
                    buf.clear();
                    skip_element(&mut self.reader)?;
                }
                Ok(Event::End(e)) if e.local_name().as_ref() == end.as_bytes() => break,
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(text)
    }

    /// Reads an Office Math subtree into a `^`/`_`/`/` spelling.
    fn read_math(&mut self, end: &str) -> Result<String> {
        let mut out = String::new();
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = get_local_name(&e);
                    buf.clear();

                    if name == "t" {
                        out.push_str(&self.read_text("t")?);
                    } else if name.ends_with("Pr") || name == "deg" {
                        skip_element(&mut self.reader)?;
                    } else {
                        let inner = self.read_math(&name)?;
                        out.push_str(&math_wrap(&name, &inner));
                    }
                }
                Ok(Event::End(e)) if e.local_name().as_ref() == end.as_bytes() => break,
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(out)
    }
}

/// Spells one math element around its already-rendered content.
fn math_wrap(name: &str, inner: &str) -> String {
    match name {
        "sup" => format!("^{{{}}}", inner),
        "sub" => format!("_{{{}}}", inner),
        "num" => group(inner),
        "den" => format!("/{}", group(inner)),
        "d" => format!("({})", inner),
        "rad" => format!("√{}", group(inner)),
        _ => inner.to_string(),
    }
}

/// Parenthesizes compound operands of a fraction or root.
fn group(inner: &str) -> String {
    if inner.chars().count() > 1 && !inner.chars().all(char::is_alphanumeric) {
        format!("({})", inner)
    } else {
        inner.to_string()
    }
}

/// Gets the local name of an element (without namespace prefix).
fn get_local_name(e: &BytesStart) -> String {
    std::str::from_utf8(e.local_name().as_ref())
        .unwrap_or("")
        .to_string()
}

/// Gets a string attribute value by local name (`r:embed` matches `embed`).
pub(super) fn get_attr_string(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name.as_bytes() {
            if let Ok(val) = std::str::from_utf8(&attr.value) {
                return Some(val.to_string());
            }
        }
    }
    None
}

/// Skips an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut depth = 1;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> String {
        format!(
            r#"<w:document xmlns:w="w" xmlns:m="m" xmlns:r="r" xmlns:a="a" xmlns:mc="mc"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn lines(body: &str) -> Vec<String> {
        parse_body(&doc(body), &HashMap::new()).unwrap()
    }

    #[test]
    fn test_runs_join() {
        let got = lines(
            r#"<w:p><w:r><w:t>১. বেগের </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>একক</w:t></w:r></w:p><w:p><w:r><w:t>ক) m/s</w:t></w:r></w:p>"#,
        );
        assert_eq!(got, vec!["১. বেগের একক", "ক) m/s"]);
    }

    #[test]
    fn test_tab_and_break() {
        let got = lines(
            r#"<w:p><w:r><w:t>ক) এক</w:t><w:tab/><w:t>খ) দুই</w:t><w:br/><w:t>গ) তিন</w:t></w:r></w:p>"#,
        );
        assert_eq!(got, vec!["ক) এক খ) দুই", "গ) তিন"]);
    }

    #[test]
    fn test_empty_paragraph_kept_raw() {
        let got = lines(r#"<w:p/><w:p><w:pPr><w:jc w:val="center"/></w:pPr></w:p>"#);
        assert_eq!(got, vec![""]);
    }

    #[test]
    fn test_office_math() {
        let got = lines(
            r#"<w:p><w:r><w:t>মান</w:t></w:r><m:oMath><m:sSup><m:sSupPr><m:ctrlPr/></m:sSupPr><m:e><m:r><m:t>x</m:t></m:r></m:e><m:sup><m:r><m:t>2</m:t></m:r></m:sup></m:sSup></m:oMath></w:p>"#,
        );
        assert_eq!(got, vec!["মান $x^{2}$ "]);
    }

    #[test]
    fn test_fraction() {
        let got = lines(
            r#"<w:p><m:oMath><m:f><m:num><m:r><m:t>a+b</m:t></m:r></m:num><m:den><m:r><m:t>2</m:t></m:r></m:den></m:f></m:oMath></w:p>"#,
        );
        assert_eq!(got, vec![" $(a+b)/2$ "]);
    }

    #[test]
    fn test_image_resolved_through_rels() {
        let mut rels = HashMap::new();
        rels.insert("rId7".to_string(), "media/image1.png".to_string());
        let xml = doc(
            r#"<w:p><w:r><w:drawing><wp:inline xmlns:wp="wp"><a:graphic><a:graphicData><pic:pic xmlns:pic="pic"><pic:blipFill><a:blip r:embed="rId7"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        );
        let got = parse_body(&xml, &rels).unwrap();
        assert_eq!(got.len(), 1);
        assert!(got[0].contains(r"\includegraphics{media/image1.png}"));
    }

    #[test]
    fn test_fallback_and_deleted_text_skipped() {
        let got = lines(
            r#"<w:p><w:r><w:t>রাখো</w:t></w:r><w:del><w:r><w:delText>মুছে</w:delText></w:r></w:del><mc:AlternateContent><mc:Choice/><mc:Fallback><w:t>দ্বিগুণ</w:t></mc:Fallback></mc:AlternateContent></w:p>"#,
        );
        assert_eq!(got, vec!["রাখো"]);
    }

    #[test]
    fn test_table_paragraphs_included() {
        let got = lines(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>ক) এক</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>খ) দুই</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(got, vec!["ক) এক", "খ) দুই"]);
    }
}
