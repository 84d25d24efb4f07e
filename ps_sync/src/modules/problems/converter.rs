use ego_tree::NodeRef;
use ps_sync_libs::notion::block::ContentBlock;
use pulldown_cmark::{html, Options, Parser};
use scraper::{ElementRef, Html, Node, Selector};

/// Code fences in descriptions are not language tagged.
const CODE_LANGUAGE: &str = "plain text";

/// Converts a markdown description into the flat block sequence the page
/// body accepts.
///
/// The document is rendered to HTML first, then only the top level children
/// of the rendered tree are walked in document order. Nesting beyond the
/// explicitly handled tags is flattened or dropped.
pub struct BlockConverter {
    img: Selector,
    li: Selector,
    tr: Selector,
    td: Selector,
}

impl BlockConverter {
    pub fn new() -> Self {
        let img = Selector::parse("img").unwrap();
        let li = Selector::parse("li").unwrap();
        let tr = Selector::parse("tr").unwrap();
        let td = Selector::parse("td").unwrap();

        Self { img, li, tr, td }
    }

    pub fn convert(&self, markdown: &str) -> Vec<ContentBlock> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        let parser = Parser::new_ext(markdown, options);
        let mut rendered = String::new();
        html::push_html(&mut rendered, parser);

        let fragment = Html::parse_fragment(&rendered);
        let mut blocks: Vec<ContentBlock> = Vec::new();
        for node in fragment.root_element().children() {
            self.push_node(node, &mut blocks);
        }

        blocks
    }

    fn push_node(&self, node: NodeRef<'_, Node>, blocks: &mut Vec<ContentBlock>) {
        match node.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    blocks.push(ContentBlock::Paragraph {
                        text: String::from(text),
                    });
                }
            }
            Node::Element(element) => {
                let element_ref = match ElementRef::wrap(node) {
                    Some(element_ref) => element_ref,
                    None => return,
                };
                match element.name() {
                    "h1" => blocks.push(ContentBlock::Heading {
                        level: 1,
                        text: flattened_text(element_ref),
                    }),
                    "h2" => blocks.push(ContentBlock::Heading {
                        level: 2,
                        text: flattened_text(element_ref),
                    }),
                    "h3" => blocks.push(ContentBlock::Heading {
                        level: 3,
                        text: flattened_text(element_ref),
                    }),
                    "p" => self.push_paragraph(element_ref, blocks),
                    "ul" => {
                        for item in element_ref.select(&self.li) {
                            blocks.push(ContentBlock::BulletedItem {
                                text: flattened_text(item),
                            });
                        }
                    }
                    "ol" => {
                        for (index, item) in element_ref.select(&self.li).enumerate() {
                            blocks.push(ContentBlock::NumberedItem {
                                text: format!("{}. {}", index + 1, flattened_text(item)),
                            });
                        }
                    }
                    "table" => self.push_table(element_ref, blocks),
                    "pre" | "code" => blocks.push(ContentBlock::Code {
                        language: String::from(CODE_LANGUAGE),
                        text: element_ref.text().collect(),
                    }),
                    "img" => push_image(element_ref, blocks),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Emits the paragraph text first, then every embedded image with its alt
    /// text as a trailing paragraph.
    fn push_paragraph(&self, element: ElementRef<'_>, blocks: &mut Vec<ContentBlock>) {
        let text = flattened_text(element);
        if !text.is_empty() {
            blocks.push(ContentBlock::Paragraph { text });
        }
        for image in element.select(&self.img) {
            push_image(image, blocks);
        }
    }

    /// The body format has no table block; every row is flattened to one
    /// paragraph of cell texts. Header rows carry no recognized cells.
    fn push_table(&self, element: ElementRef<'_>, blocks: &mut Vec<ContentBlock>) {
        for row in element.select(&self.tr) {
            let cells: Vec<String> = row.select(&self.td).map(flattened_text).collect();
            blocks.push(ContentBlock::Paragraph {
                text: cells.join(" | "),
            });
        }
    }
}

fn push_image(element: ElementRef<'_>, blocks: &mut Vec<ContentBlock>) {
    let src = match element.value().attr("src") {
        Some(src) => src,
        None => return,
    };
    if !src.starts_with("http") {
        // Only externally hosted images can be rendered by the destination.
        return;
    }

    blocks.push(ContentBlock::Image {
        url: String::from(src),
    });

    let alt = element.value().attr("alt").unwrap_or("").trim();
    if !alt.is_empty() {
        blocks.push(ContentBlock::Paragraph {
            text: String::from(alt),
        });
    }
}

fn flattened_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
