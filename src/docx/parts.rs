//! Package parts other than the document body.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::style::ParagraphStyle;

pub(crate) const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

pub(crate) const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Numbering instance used by the `ListBullet` style.
pub(crate) const BULLET_NUM_ID: u32 = 1;
/// Numbering instance used by the `ListNumber` style.
pub(crate) const DECIMAL_NUM_ID: u32 = 2;

pub(crate) fn content_types() -> String {
    format!(
        "{XML_DECLARATION}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
<Override PartName=\"/word/numbering.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml\"/>\
<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
<Override PartName=\"/docProps/app.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.extended-properties+xml\"/>\
</Types>"
    )
}

pub(crate) fn package_rels() -> String {
    format!(
        "{XML_DECLARATION}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
<Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties\" Target=\"docProps/app.xml\"/>\
</Relationships>"
    )
}

pub(crate) fn document_rels() -> String {
    format!(
        "{XML_DECLARATION}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering\" Target=\"numbering.xml\"/>\
</Relationships>"
    )
}

pub(crate) fn core_properties(title: Option<&str>) -> String {
    let mut xml = format!(
        "{XML_DECLARATION}<cp:coreProperties \
xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
xmlns:dcterms=\"http://purl.org/dc/terms/\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">"
    );
    if let Some(title) = title {
        let _ = write!(xml, "<dc:title>{}</dc:title>", escape(title));
    }
    xml.push_str("<dc:creator>mdstyle</dc:creator></cp:coreProperties>");
    xml
}

pub(crate) fn app_properties() -> String {
    format!(
        "{XML_DECLARATION}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
<Application>mdstyle {}</Application></Properties>",
        env!("CARGO_PKG_VERSION")
    )
}

pub(crate) fn numbering() -> String {
    format!(
        "{XML_DECLARATION}<w:numbering xmlns:w=\"{W_NAMESPACE}\">\
<w:abstractNum w:abstractNumId=\"0\"><w:multiLevelType w:val=\"singleLevel\"/>\
<w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"bullet\"/><w:lvlText w:val=\"\u{2022}\"/>\
<w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr></w:lvl></w:abstractNum>\
<w:abstractNum w:abstractNumId=\"1\"><w:multiLevelType w:val=\"singleLevel\"/>\
<w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"decimal\"/><w:lvlText w:val=\"%1.\"/>\
<w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr></w:lvl></w:abstractNum>\
<w:num w:numId=\"{BULLET_NUM_ID}\"><w:abstractNumId w:val=\"0\"/></w:num>\
<w:num w:numId=\"{DECIMAL_NUM_ID}\"><w:abstractNumId w:val=\"1\"/></w:num>\
</w:numbering>"
    )
}

/// Paragraph style definition written to `styles.xml`.
struct StyleDef {
    style: ParagraphStyle,
    /// Font size in half-points.
    size: Option<u32>,
    bold: bool,
    italic: bool,
    /// Extra `w:pPr` children.
    paragraph: String,
}

impl StyleDef {
    fn new(style: ParagraphStyle) -> Self {
        Self {
            style,
            size: None,
            bold: false,
            italic: false,
            paragraph: String::new(),
        }
    }

    fn to_xml(&self, xml: &mut String) {
        let _ = write!(
            xml,
            "<w:style w:type=\"paragraph\" w:styleId=\"{}\"",
            self.style.style_id()
        );
        if self.style == ParagraphStyle::Normal {
            xml.push_str(" w:default=\"1\"");
        }
        let _ = write!(xml, "><w:name w:val=\"{}\"/>", self.style.display_name());
        if self.style != ParagraphStyle::Normal {
            xml.push_str("<w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>");
        }
        xml.push_str("<w:qFormat/>");

        if !self.paragraph.is_empty() {
            let _ = write!(xml, "<w:pPr>{}</w:pPr>", self.paragraph);
        }
        if self.bold || self.italic || self.size.is_some() {
            xml.push_str("<w:rPr>");
            if self.bold {
                xml.push_str("<w:b/>");
            }
            if self.italic {
                xml.push_str("<w:i/>");
            }
            if let Some(size) = self.size {
                let _ = write!(xml, "<w:sz w:val=\"{size}\"/>");
            }
            xml.push_str("</w:rPr>");
        }
        xml.push_str("</w:style>");
    }
}

/// Heading sizes in half-points, levels 1 to 6.
const HEADING_SIZES: [u32; 6] = [32, 28, 26, 24, 22, 22];

fn style_defs() -> Vec<StyleDef> {
    let mut defs = vec![StyleDef::new(ParagraphStyle::Normal)];

    let mut title = StyleDef::new(ParagraphStyle::Title);
    title.size = Some(56);
    title.paragraph = "<w:spacing w:after=\"240\"/><w:outlineLvl w:val=\"0\"/>".into();
    defs.push(title);

    for (index, size) in HEADING_SIZES.iter().enumerate() {
        let level = index as u8 + 1;
        let mut heading = StyleDef::new(ParagraphStyle::Heading(level));
        heading.size = Some(*size);
        heading.bold = true;
        heading.paragraph = format!(
            "<w:keepNext/><w:spacing w:before=\"240\" w:after=\"80\"/><w:outlineLvl w:val=\"{index}\"/>"
        );
        defs.push(heading);
    }

    for (style, num_id) in [
        (ParagraphStyle::ListBullet, BULLET_NUM_ID),
        (ParagraphStyle::ListNumber, DECIMAL_NUM_ID),
    ] {
        let mut list = StyleDef::new(style);
        list.paragraph = format!(
            "<w:numPr><w:numId w:val=\"{num_id}\"/></w:numPr><w:ind w:left=\"720\" w:hanging=\"360\"/>"
        );
        defs.push(list);
    }

    let mut quote = StyleDef::new(ParagraphStyle::Quote);
    quote.italic = true;
    quote.paragraph = "<w:ind w:left=\"720\" w:right=\"720\"/>".into();
    defs.push(quote);

    defs
}

/// `styles.xml` with every [`ParagraphStyle`] the writer can reference.
pub(crate) fn styles(body_font: &str) -> String {
    let font = escape(body_font);
    let mut xml = format!(
        "{XML_DECLARATION}<w:styles xmlns:w=\"{W_NAMESPACE}\">\
<w:docDefaults><w:rPrDefault><w:rPr>\
<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/><w:sz w:val=\"22\"/>\
</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after=\"160\" w:line=\"259\" w:lineRule=\"auto\"/>\
</w:pPr></w:pPrDefault></w:docDefaults>"
    );
    for def in style_defs() {
        def.to_xml(&mut xml);
    }
    xml.push_str("</w:styles>");
    xml
}
