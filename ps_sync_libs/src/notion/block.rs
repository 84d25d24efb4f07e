use serde_json::{json, Map, Value};

/// One unit of page body content, in source document order.
///
/// The body format is flat: nesting in the source markup has already been
/// discarded by the time blocks are produced. Image alt text travels as a
/// separate trailing paragraph, not on the image variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    BulletedItem { text: String },
    NumberedItem { text: String },
    Code { language: String, text: String },
    Image { url: String },
}

impl ContentBlock {
    pub fn to_json(&self) -> Value {
        match self {
            ContentBlock::Heading { level, text } => {
                let kind = match level {
                    1 => "heading_1",
                    2 => "heading_2",
                    _ => "heading_3",
                };
                tagged(kind, rich_text(text))
            }
            ContentBlock::Paragraph { text } => tagged("paragraph", rich_text(text)),
            ContentBlock::BulletedItem { text } => tagged("bulleted_list_item", rich_text(text)),
            ContentBlock::NumberedItem { text } => tagged("numbered_list_item", rich_text(text)),
            ContentBlock::Code { language, text } => {
                let mut payload = rich_text(text);
                payload["language"] = json!(language);
                tagged("code", payload)
            }
            ContentBlock::Image { url } => tagged(
                "image",
                json!({ "type": "external", "external": { "url": url } }),
            ),
        }
    }
}

/// Wraps a type specific payload into the envelope every block shares.
fn tagged(kind: &str, payload: Value) -> Value {
    let mut block = Map::new();
    block.insert(String::from("object"), json!("block"));
    block.insert(String::from("type"), json!(kind));
    block.insert(String::from(kind), payload);
    Value::Object(block)
}

fn rich_text(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": text } }] })
}
